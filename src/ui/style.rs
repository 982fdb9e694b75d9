//! Theming and color definitions.
//!
//! Each [`Theme`] maps to a [`Palette`]. Unlike the terminal default
//! colours, the palette paints its own backgrounds so switching themes is
//! visible regardless of the terminal's colour scheme.

use ratatui::style::{Color, Modifier, Style};

use crate::config::Theme;
use crate::document::{InlineColor, InlineStyle, LineType};

/// Colours and styles for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Screen background behind the panes
    pub background: Color,
    /// Pane background
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Style,
    pub button: Style,
    pub button_disabled: Style,
    pub cursor: Style,
    pub status_bg: Color,
    pub status_fg: Color,
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    pub h4: Style,
    pub code: Style,
    pub inline_code: Style,
    pub quote: Style,
    pub link: Color,
    pub image: Style,
    pub hr: Style,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::Indexed(234),
            surface: Color::Indexed(236),
            text: Color::Indexed(252),
            muted: Color::Indexed(244),
            border: Color::Indexed(240),
            border_focused: Color::Indexed(39),
            title: Style::default()
                .fg(Color::Indexed(253))
                .add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::Indexed(252)).bg(Color::Indexed(238)),
            button_disabled: Style::default()
                .fg(Color::Indexed(242))
                .bg(Color::Indexed(236))
                .add_modifier(Modifier::DIM),
            cursor: Style::default().fg(Color::Black).bg(Color::Indexed(252)),
            status_bg: Color::Indexed(238),
            status_fg: Color::Indexed(252),
            h1: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(245)),
            inline_code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(110))
                .add_modifier(Modifier::ITALIC),
            link: Color::LightBlue,
            image: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
            hr: Style::default().fg(Color::Indexed(240)),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Indexed(254),
            surface: Color::Indexed(231),
            text: Color::Indexed(235),
            muted: Color::Indexed(243),
            border: Color::Indexed(250),
            border_focused: Color::Indexed(33),
            title: Style::default()
                .fg(Color::Indexed(236))
                .add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::Indexed(237)).bg(Color::Indexed(231)),
            button_disabled: Style::default()
                .fg(Color::Indexed(248))
                .bg(Color::Indexed(254))
                .add_modifier(Modifier::DIM),
            cursor: Style::default().fg(Color::White).bg(Color::Indexed(236)),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
            h1: Style::default()
                .fg(Color::Indexed(31))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(28))
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Indexed(136))
                .add_modifier(Modifier::BOLD),
            h4: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(240)),
            inline_code: Style::default()
                .fg(Color::Indexed(124))
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::ITALIC),
            link: Color::Indexed(25),
            image: Style::default()
                .fg(Color::Indexed(133))
                .add_modifier(Modifier::ITALIC),
            hr: Style::default().fg(Color::Indexed(245)),
        }
    }

    /// Plain text on the pane background.
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette::dark(),
        Theme::Light => Palette::light(),
    }
}

/// Get the style for a given line type.
pub fn style_for_line_type(line_type: &LineType, palette: &Palette) -> Style {
    let base = palette.base();
    match line_type {
        LineType::Heading(1) => base.patch(palette.h1),
        LineType::Heading(2) => base.patch(palette.h2),
        LineType::Heading(3) => base.patch(palette.h3),
        LineType::Heading(_) => base.patch(palette.h4),
        LineType::CodeBlock => base.patch(palette.code),
        LineType::BlockQuote => base.patch(palette.quote),
        LineType::HorizontalRule => base.patch(palette.hr),
        LineType::Image => base.patch(palette.image),
        LineType::Footnote => base.fg(palette.muted),
        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => base,
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle, palette: &Palette) -> Style {
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style
            .fg(fg_color_for_terminal(fg))
            .remove_modifier(Modifier::DIM);
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
        if inline.fg.is_none() {
            style = style.fg(palette.link);
        }
    }
    if inline.code && inline.fg.is_none() && base != style_for_line_type(&LineType::CodeBlock, palette)
    {
        style = style.patch(palette.inline_code);
    }

    style
}

fn fg_color_for_terminal(fg: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(fg.r, fg.g, fg.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(fg.r, fg.g, fg.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("MARKPAD_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    term.is_some_and(|t| {
        let lower = t.to_ascii_lowercase();
        lower.contains("direct") || lower.contains("truecolor")
    })
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}
