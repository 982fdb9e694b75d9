use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::model::Focus;
use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::ui::{ToolbarAction, point_in_rect};

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;
const WHEEL_DELTA: isize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Self::handle_paste(text, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "event.resize.queue");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('q' | 'Q' | 'c' | 'C')) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return match key.code {
                KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                    Some(Message::HideHelp)
                }
                _ => None,
            };
        }

        if let Some(prompt) = &model.upload {
            return match key.code {
                KeyCode::Esc => Some(Message::CancelUpload),
                KeyCode::Enter => Some(Message::UploadSubmit),
                KeyCode::Tab => Some(Message::UploadComplete),
                KeyCode::Backspace => {
                    let mut input = prompt.input.clone();
                    input.pop();
                    Some(Message::UploadInput(input))
                }
                KeyCode::Char('u') if ctrl => Some(Message::UploadInput(String::new())),
                KeyCode::Char(c) if !ctrl => Some(Message::UploadInput(format!("{}{c}", prompt.input))),
                _ => None,
            };
        }

        if ctrl && let KeyCode::Char(c) = key.code {
            match c.to_ascii_lowercase() {
                'z' => return Some(Message::Undo),
                't' => return Some(Message::ToggleTheme),
                'y' => return Some(Message::Copy),
                's' => return Some(Message::Download),
                'o' => return Some(Message::OpenUpload),
                'e' => return Some(Message::ExportHtml),
                _ => {}
            }
        }

        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(n @ 2..=6) => {
                return ToolbarAction::ALL
                    .get(usize::from(n - 2))
                    .map(|action| toolbar_message(*action));
            }
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            _ => {}
        }

        match model.focus {
            Focus::Editor => Self::handle_editor_key(key, ctrl),
            Focus::Preview => Self::handle_preview_key(key),
        }
    }

    fn handle_editor_key(key: KeyEvent, ctrl: bool) -> Option<Message> {
        match key.code {
            KeyCode::Char(c) if !ctrl => Some(Message::InsertChar(c)),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::EditorPageUp),
            KeyCode::PageDown => Some(Message::EditorPageDown),
            _ => None,
        }
    }

    fn handle_preview_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::PreviewScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::PreviewScrollDown(1)),
            KeyCode::PageUp | KeyCode::Char('b') => Some(Message::PreviewPageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PreviewPageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::PreviewTop),
            KeyCode::End | KeyCode::Char('G') => Some(Message::PreviewBottom),
            KeyCode::Esc => Some(Message::SetFocus(Focus::Editor)),
            _ => None,
        }
    }

    fn handle_paste(text: &str, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        if let Some(prompt) = &model.upload {
            let line = text.lines().next().unwrap_or_default();
            return Some(Message::UploadInput(format!("{}{line}", prompt.input)));
        }
        Some(Message::Paste(text.to_string()))
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                .then_some(Message::HideHelp);
        }
        if model.upload.is_some() {
            return None;
        }

        let (width, height) = model.size;
        let layout = crate::ui::screen_layout(Rect::new(0, 0, width, height));
        let in_editor = point_in_rect(mouse.column, mouse.row, layout.editor);
        let in_preview = point_in_rect(mouse.column, mouse.row, layout.preview);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) =
                    crate::ui::toolbar_button_at(layout.header, model.theme, mouse.column, mouse.row)
                {
                    return Some(toolbar_message(action));
                }
                if in_editor {
                    return editor_click(model, layout.editor, mouse.column, mouse.row);
                }
                if in_preview {
                    return Some(Message::SetFocus(Focus::Preview));
                }
                None
            }
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScroll(-WHEEL_DELTA)),
            MouseEventKind::ScrollDown if in_editor => Some(Message::EditorScroll(WHEEL_DELTA)),
            MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::PreviewScrollDown(WHEEL_LINES))
            }
            _ => None,
        }
    }
}

const fn toolbar_message(action: ToolbarAction) -> Message {
    match action {
        ToolbarAction::Theme => Message::ToggleTheme,
        ToolbarAction::Undo => Message::Undo,
        ToolbarAction::Copy => Message::Copy,
        ToolbarAction::Download => Message::Download,
        ToolbarAction::Upload => Message::OpenUpload,
    }
}

fn editor_click(model: &Model, pane: Rect, column: u16, row: u16) -> Option<Message> {
    let inner = crate::ui::pane_inner(pane);
    if !point_in_rect(column, row, inner) {
        return Some(Message::SetFocus(Focus::Editor));
    }
    let gutter = crate::ui::line_number_width(model.buffer.line_count()) + 1;
    let text_x = inner.x + gutter;
    let line = model.editor_scroll_offset + usize::from(row - inner.y);
    let col = model.editor_col_offset + usize::from(column.saturating_sub(text_x));
    Some(Message::ClickEditor { line, col })
}
