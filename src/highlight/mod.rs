//! Syntax highlighting for fenced code blocks in the preview.
//!
//! Uses syntect with its bundled Sublime Text syntaxes. The syntect theme
//! follows the editor [`Theme`]; backgrounds are never emitted so the pane
//! palette shows through.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::config::Theme;
use crate::document::{InlineColor, InlineSpan, InlineStyle};

/// Highlight `code` line by line.
///
/// Returns one span list per line of `code`. Unknown or missing languages
/// produce plain code-styled spans.
pub fn highlight_code(language: Option<&str>, code: &str, theme: Theme) -> Vec<Vec<InlineSpan>> {
    let plain = InlineStyle {
        code: true,
        ..InlineStyle::default()
    };
    let syntax_set = syntax_set();
    let syntax = language.and_then(|lang| {
        syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| syntax_set.find_syntax_by_name(lang))
    });

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| vec![InlineSpan::new(line, plain)])
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, syntect_theme(theme));
    let mut lines = Vec::new();
    for line in code.lines() {
        let ranges = match highlighter.highlight_line(line, syntax_set) {
            Ok(ranges) => ranges,
            Err(err) => {
                tracing::debug!(%err, language, "highlight.fallback");
                lines.push(vec![InlineSpan::new(line, plain)]);
                continue;
            }
        };
        let spans = ranges
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(style, text)| {
                let fg = InlineColor {
                    r: style.foreground.r,
                    g: style.foreground.g,
                    b: style.foreground.b,
                };
                let inline = InlineStyle {
                    fg: Some(adjust_fg_for_theme(fg, theme)),
                    strong: style.font_style.contains(FontStyle::BOLD),
                    emphasis: style.font_style.contains(FontStyle::ITALIC),
                    ..plain
                };
                InlineSpan::new(text, inline)
            })
            .collect();
        lines.push(spans);
    }
    lines
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

fn syntect_theme(theme: Theme) -> &'static SyntectTheme {
    static DARK: OnceLock<SyntectTheme> = OnceLock::new();
    static LIGHT: OnceLock<SyntectTheme> = OnceLock::new();
    let (cell, preferred) = match theme {
        Theme::Dark => (
            &DARK,
            ["base16-ocean.dark", "base16-eighties.dark", "Solarized (dark)"].as_slice(),
        ),
        Theme::Light => (
            &LIGHT,
            ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"].as_slice(),
        ),
    };
    cell.get_or_init(|| {
        let themes = &theme_set().themes;
        preferred
            .iter()
            .find_map(|name| themes.get(*name))
            .or_else(|| themes.values().next())
            .cloned()
            .unwrap_or_default()
    })
}

/// Darken bright foregrounds on light backgrounds so they stay readable.
fn adjust_fg_for_theme(color: InlineColor, theme: Theme) -> InlineColor {
    match theme {
        Theme::Dark => color,
        Theme::Light => {
            let luma = 0.0722f32.mul_add(
                f32::from(color.b),
                0.2126f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
            );
            if luma < 155.0 {
                return color;
            }
            let darken = |c: u8| (f32::from(c) * 0.42).round().clamp(0.0, 255.0) as u8;
            InlineColor {
                r: darken(color.r),
                g: darken(color.g),
                b: darken(color.b),
            }
        }
    }
}
