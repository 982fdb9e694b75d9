use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::Palette;

const KEY_HINTS: &str =
    " ^Z undo  ^Y copy  ^S download  ^O upload  ^E export html  ^T theme  Tab focus  ^Q quit";

pub fn render_status_bar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let modified = if model.is_modified() {
        " [modified]"
    } else {
        ""
    };
    let cursor = model.buffer.cursor();
    let status = format!(
        " {}{}  Ln {}, Col {}  History {}/{}  {}  F1:help",
        model.file_label,
        modified,
        cursor.line + 1,
        model.buffer.cursor_display_col() + 1,
        model.history.index() + 1,
        model.history.len(),
        model.theme.label(),
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(palette.status_bg).fg(palette.status_fg));
    frame.render_widget(status_bar, area);
}

/// The active toast, or the key hints when there is none.
pub fn render_message_line(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        let hints = Paragraph::new(KEY_HINTS)
            .style(Style::default().bg(palette.background).fg(palette.muted));
        frame.render_widget(hints, area);
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::Indexed(24)).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!(" {prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
