use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::style::Palette;

const HELP_KEYS: &[(&str, &str)] = &[
    ("Ctrl+Z / F3", "Undo"),
    ("Ctrl+T / F2", "Toggle light/dark theme"),
    ("Ctrl+Y / F4", "Copy document to clipboard"),
    ("Ctrl+S / F5", "Download as document.md"),
    ("Ctrl+O / F6", "Upload a markdown file"),
    ("Ctrl+E", "Export as document.html"),
    ("Tab", "Switch editor / preview focus"),
    ("Arrows, Home/End", "Move cursor"),
    ("Ctrl+Left/Right", "Word movement"),
    ("Ctrl+Home/End", "Document start / end"),
    ("PageUp/PageDown", "Page editor or preview"),
    ("j/k, g/G", "Scroll preview (preview focused)"),
    ("Mouse", "Click buttons, place cursor, wheel scrolls"),
    ("F1 / Esc", "Close help"),
    ("Ctrl+Q", "Quit"),
];

pub fn help_popup_rect(area: Rect) -> Rect {
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = HELP_KEYS.len() as u16 + 10;
    centered_popup_rect(area.width.saturating_sub(12).max(56), needed_rows, area)
}

pub fn render_help_overlay(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup = help_popup_rect(area);
    let section_style = Style::default()
        .fg(palette.border_focused)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(palette.muted);

    let mut lines: Vec<Line> = vec![Line::styled("Keys", section_style)];
    for (keys, action) in HELP_KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {keys:<20}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(*action),
        ]));
    }

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    lines.push(Line::raw(""));
    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));
    lines.push(Line::raw(format!(
        "  Downloads: {}",
        model.download_dir.display()
    )));
    lines.push(Line::raw(""));
    lines.push(Line::styled("Esc closes", dim_style));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(palette.base());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn upload_popup_rect(area: Rect, suggestions: usize) -> Rect {
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = suggestions.min(8) as u16 + 6;
    centered_popup_rect(area.width.saturating_sub(16).max(48), needed_rows, area)
}

pub fn render_upload_overlay(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let Some(prompt) = &model.upload else {
        return;
    };
    let popup = upload_popup_rect(area, prompt.suggestions.len());
    let dim_style = Style::default().fg(palette.muted);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(palette.border_focused)),
            Span::raw(prompt.input.clone()),
            Span::styled(" ", palette.cursor),
        ]),
        Line::styled(
            format!(
                "Suggested: {}  ·  Tab complete  ·  Enter open  ·  Esc cancel",
                crate::actions::accepted_extensions_hint()
            ),
            dim_style,
        ),
        Line::raw(""),
    ];
    if prompt.suggestions.is_empty() {
        lines.push(Line::styled("(no matching markdown files)", dim_style));
    }
    for (idx, suggestion) in prompt.suggestions.iter().enumerate() {
        let style = if prompt.selected == Some(idx) {
            palette.base().reversed()
        } else {
            palette.base()
        };
        lines.push(Line::styled(format!("  {suggestion}"), style));
    }

    let block = Block::default()
        .title(" Upload ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_focused))
        .padding(Padding::horizontal(1))
        .style(palette.base());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
