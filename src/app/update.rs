use crate::app::Model;
use crate::app::model::{Focus, ToastLevel, UploadPrompt};
use crate::editor::Direction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Insert pasted text at the cursor
    Paste(String),

    // Cursor
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    /// Move the cursor one editor page up
    EditorPageUp,
    /// Move the cursor one editor page down
    EditorPageDown,
    /// Place the cursor at a line and display column (mouse click)
    ClickEditor { line: usize, col: usize },
    /// Scroll the editor view without moving the cursor
    EditorScroll(isize),

    // Preview
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewPageUp,
    PreviewPageDown,
    PreviewTop,
    PreviewBottom,

    // Toolbar
    Undo,
    ToggleTheme,
    Copy,
    Download,
    ExportHtml,
    OpenUpload,

    // Upload prompt
    /// Replace the prompt input
    UploadInput(String),
    /// Cycle through the path suggestions
    UploadComplete,
    UploadSubmit,
    CancelUpload,
    /// Replace the document with text loaded from outside the editor
    LoadText(String),

    // Application
    SwitchFocus,
    SetFocus(Focus),
    ToggleHelp,
    HideHelp,
    Resize(u16, u16),
    Quit,
}

/// Pure state transition.
///
/// Every message that changes the document text records exactly one
/// history entry. Clipboard and file I/O happen afterwards in
/// `App::handle_message_side_effects`.
pub fn update(mut model: Model, msg: Message) -> Model {
    let quit_pending = std::mem::take(&mut model.quit_confirmed);

    match msg {
        Message::InsertChar(ch) => {
            let changed = model.buffer.insert_char(ch);
            after_edit(&mut model, changed);
        }
        Message::SplitLine => {
            let changed = model.buffer.split_line();
            after_edit(&mut model, changed);
        }
        Message::DeleteBack => {
            let changed = model.buffer.delete_back();
            after_edit(&mut model, changed);
        }
        Message::DeleteForward => {
            let changed = model.buffer.delete_forward();
            after_edit(&mut model, changed);
        }
        Message::Paste(text) => {
            let changed = model.buffer.insert_str(&text);
            after_edit(&mut model, changed);
        }

        Message::MoveCursor(direction) => {
            model.buffer.move_cursor(direction);
            model.ensure_cursor_visible();
        }
        Message::MoveHome => {
            model.buffer.move_home();
            model.ensure_cursor_visible();
        }
        Message::MoveEnd => {
            model.buffer.move_end();
            model.ensure_cursor_visible();
        }
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            model.ensure_cursor_visible();
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }
        Message::EditorPageUp => {
            let rows = model.editor_rows();
            model.buffer.move_page(rows, Direction::Up);
            model.ensure_cursor_visible();
        }
        Message::EditorPageDown => {
            let rows = model.editor_rows();
            model.buffer.move_page(rows, Direction::Down);
            model.ensure_cursor_visible();
        }
        Message::ClickEditor { line, col } => {
            model.focus = Focus::Editor;
            model.buffer.move_to_display(line, col);
            model.ensure_cursor_visible();
        }
        Message::EditorScroll(delta) => model.scroll_editor(delta),

        Message::PreviewScrollUp(n) => model.viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.viewport.scroll_down(n),
        Message::PreviewPageUp => model.viewport.page_up(),
        Message::PreviewPageDown => model.viewport.page_down(),
        Message::PreviewTop => model.viewport.go_to_top(),
        Message::PreviewBottom => model.viewport.go_to_bottom(),

        Message::Undo => {
            if model.history.undo().is_some() {
                model.sync_buffer_from_history();
            }
        }
        Message::ToggleTheme => {
            model.theme = model.theme.toggled();
            model.refresh_preview();
        }
        // Handled entirely as side effects.
        Message::Copy | Message::Download | Message::ExportHtml | Message::UploadSubmit => {}
        Message::OpenUpload => {
            model.help_visible = false;
            model.upload = Some(UploadPrompt::default());
        }

        Message::UploadInput(input) => {
            if let Some(prompt) = model.upload.as_mut() {
                prompt.input = input;
                prompt.selected = None;
            }
        }
        Message::UploadComplete => {
            if let Some(prompt) = model.upload.as_mut()
                && !prompt.suggestions.is_empty()
            {
                let next = prompt
                    .selected
                    .map_or(0, |idx| (idx + 1) % prompt.suggestions.len());
                prompt.selected = Some(next);
                prompt.input.clone_from(&prompt.suggestions[next]);
            }
        }
        Message::CancelUpload => model.upload = None,
        Message::LoadText(text) => {
            model.history.load_external_text(text);
            model.buffer.move_to_start();
            model.sync_buffer_from_history();
            model.viewport.go_to_top();
        }

        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Editor => Focus::Preview,
                Focus::Preview => Focus::Editor,
            };
        }
        Message::SetFocus(focus) => model.focus = focus,
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => {
            if model.is_modified() && !quit_pending {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes: Ctrl+S to download, Ctrl+Q again to quit",
                );
            } else {
                model.should_quit = true;
            }
        }
    }

    model
}

fn after_edit(model: &mut Model, changed: bool) {
    if changed {
        model.record_edit();
    }
    model.ensure_cursor_visible();
}
