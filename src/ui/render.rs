use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};

use super::style::{self, Palette};
use super::{APP_TITLE, PREVIEW_LEFT_PADDING, ToolbarAction, overlays, status};

const EDITOR_PLACEHOLDER: &str = "Type your markdown here...";

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = style::palette(model.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let layout = super::screen_layout(area);
    render_header(model, &palette, frame, layout.header);
    render_editor(model, &palette, frame, layout.editor);
    render_preview(model, &palette, frame, layout.preview);
    status::render_message_line(model, &palette, frame, layout.message);
    status::render_status_bar(model, &palette, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, &palette, frame, area);
    } else if model.upload.is_some() {
        overlays::render_upload_overlay(model, &palette, frame, area);
    }
}

fn render_header(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(format!(" ✎ {APP_TITLE}")).style(palette.title.bg(palette.background));
    frame.render_widget(title, area);

    for (action, rect) in super::toolbar_buttons(area, model.theme) {
        let style = if action == ToolbarAction::Undo && !model.history.can_undo() {
            palette.button_disabled
        } else {
            palette.button
        };
        frame.render_widget(
            Paragraph::new(action.label(model.theme)).style(style),
            rect,
        );
    }
}

fn pane_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    let border = if focused {
        Style::default()
            .fg(palette.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.border)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
        .style(palette.base())
}

fn render_editor(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Editor;
    let block = pane_block(" Editor ", focused, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let text_width = inner.width.saturating_sub(gutter_width + 1) as usize;
    let cursor = buf.cursor();
    let gutter_style = Style::default().fg(palette.muted).bg(palette.surface);
    let cursor_style = if focused {
        palette.cursor
    } else {
        palette.base().add_modifier(Modifier::UNDERLINED)
    };

    let start = model.editor_scroll_offset;
    let end = (start + inner.height as usize).min(total_lines);
    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);
        let mut spans = vec![Span::styled(line_num, gutter_style)];
        let cursor_col = (line_idx == cursor.line).then_some(cursor.col);
        spans.extend(editor_line_spans(
            &line_text,
            cursor_col,
            model.editor_col_offset,
            text_width,
            palette.base(),
            cursor_style,
        ));
        if total_lines == 1 && line_text.is_empty() {
            spans.push(Span::styled(
                EDITOR_PLACEHOLDER,
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content).style(palette.base()), inner);
}

/// Spans for one editor line, clipped horizontally, with the cursor cell
/// split out when `cursor_col` is set.
fn editor_line_spans(
    line: &str,
    cursor_col: Option<usize>,
    col_offset: usize,
    width: usize,
    base: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    let mut before = String::new();
    let mut at_cursor: Option<String> = None;
    let mut after = String::new();
    let mut display = 0;

    for (idx, ch) in line.char_indices() {
        let (shown, w) = match ch {
            '\t' => (' ', 1),
            ch => (ch, ch.width().unwrap_or(0)),
        };
        let visible = display >= col_offset && display + w <= col_offset + width;
        display += w;
        if !visible {
            continue;
        }
        match cursor_col {
            Some(col) if idx == col => at_cursor = Some(shown.to_string()),
            Some(col) if idx > col => after.push(shown),
            _ => before.push(shown),
        }
    }

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::styled(before, base));
    }
    if cursor_col.is_some() {
        spans.push(Span::styled(
            at_cursor.unwrap_or_else(|| " ".to_string()),
            cursor_style,
        ));
    }
    if !after.is_empty() {
        spans.push(Span::styled(after, base));
    }
    spans
}

fn render_preview(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Preview;
    let block = pane_block(" Preview ", focused, palette)
        .padding(Padding::left(PREVIEW_LEFT_PADDING));
    let block = if model.viewport.total_lines() > model.viewport.height() as usize {
        block.title(
            Line::from(format!(" {}% ", model.viewport.scroll_percent())).right_aligned(),
        )
    } else {
        block
    };

    let range = model.viewport.visible_range();
    let content: Vec<Line> = model.preview.lines()[range]
        .iter()
        .map(|line| {
            let line_style = style::style_for_line_type(&line.line_type, palette);
            let spans: Vec<Span> = line
                .spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text.clone(),
                        style::style_for_inline(line_style, span.style, palette),
                    )
                })
                .collect();
            Line::from(spans).style(line_style)
        })
        .collect();

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
