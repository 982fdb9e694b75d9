use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::actions::ClipboardService;
use crate::config::Theme;
use crate::document::{Preview, render};
use crate::editor::EditorBuffer;
use crate::history::EditHistory;
use crate::ui::viewport::Viewport;

const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Preview,
}

/// State of the upload path prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPrompt {
    pub input: String,
    pub suggestions: Vec<String>,
    pub selected: Option<usize>,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The editor buffer
/// always holds the same text as the current history entry.
pub struct Model {
    /// Snapshots of every edit; the current entry is the document
    pub history: EditHistory,
    /// The editor pane text and cursor
    pub buffer: EditorBuffer,
    /// Rendered preview of the current document
    pub preview: Preview,
    /// Preview scroll position
    pub viewport: Viewport,
    pub theme: Theme,
    pub focus: Focus,
    /// First visible editor line
    pub editor_scroll_offset: usize,
    /// First visible editor display column
    pub editor_col_offset: usize,
    /// Terminal size (columns, rows)
    pub size: (u16, u16),
    /// Name shown in the status bar
    pub file_label: String,
    /// Where downloads and exports are written
    pub download_dir: PathBuf,
    /// Text as of the last download or load, for the modified marker
    pub last_saved: String,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    pub upload: Option<UploadPrompt>,
    /// Set after a quit attempt with unsaved changes; a second quit proceeds
    pub quit_confirmed: bool,
    pub should_quit: bool,
    /// Clipboard handle kept for the whole session
    pub clipboard: ClipboardService,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_label", &self.file_label)
            .field("history_index", &self.history.index())
            .field("history_len", &self.history.len())
            .field("theme", &self.theme)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model showing `seed` in a terminal of `terminal_size`.
    pub fn new(seed: impl Into<String>, terminal_size: (u16, u16), theme: Theme) -> Self {
        let seed = seed.into();
        let (width, height) = terminal_size;
        let preview = render(&seed, crate::ui::preview_content_width(width, height), theme);
        let viewport = Viewport::new(
            crate::ui::pane_text_rows(width, height),
            preview.line_count(),
        );

        Self {
            buffer: EditorBuffer::from_text(&seed),
            last_saved: seed.clone(),
            history: EditHistory::new(seed),
            preview,
            viewport,
            theme,
            focus: Focus::Editor,
            editor_scroll_offset: 0,
            editor_col_offset: 0,
            size: terminal_size,
            file_label: "untitled".to_string(),
            download_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            upload: None,
            quit_confirmed: false,
            should_quit: false,
            clipboard: ClipboardService::new(),
            toast: None,
        }
    }

    /// The current document text.
    pub fn text(&self) -> &str {
        self.history.current()
    }

    /// Whether the document differs from what was last saved or loaded.
    pub fn is_modified(&self) -> bool {
        self.history.current() != self.last_saved
    }

    /// Snapshot the buffer into history after a text-changing edit.
    pub(super) fn record_edit(&mut self) {
        self.history.apply_edit(self.buffer.text());
        self.refresh_preview();
    }

    /// Show the current history entry in the editor after undo or a load.
    pub(super) fn sync_buffer_from_history(&mut self) {
        self.buffer.replace_text(self.history.current());
        self.refresh_preview();
        self.ensure_cursor_visible();
    }

    /// Re-render the preview for the current text, width and theme.
    pub fn refresh_preview(&mut self) {
        let (width, height) = self.size;
        self.preview = render(
            self.history.current(),
            crate::ui::preview_content_width(width, height),
            self.theme,
        );
        self.viewport.set_total_lines(self.preview.line_count());
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.viewport.resize(crate::ui::pane_text_rows(width, height));
        self.refresh_preview();
        self.ensure_cursor_visible();
    }

    pub(super) fn editor_rows(&self) -> usize {
        crate::ui::pane_text_rows(self.size.0, self.size.1) as usize
    }

    /// Scroll the editor so the cursor stays on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.editor_rows().max(1);
        let cursor = self.buffer.cursor();
        let max_offset = self.buffer.line_count().saturating_sub(rows);
        if cursor.line < self.editor_scroll_offset {
            self.editor_scroll_offset = cursor.line;
        } else if cursor.line >= self.editor_scroll_offset + rows {
            self.editor_scroll_offset = cursor.line + 1 - rows;
        }
        self.editor_scroll_offset = self.editor_scroll_offset.min(max_offset);

        let cols = crate::ui::editor_text_cols(self.size.0, self.size.1, self.buffer.line_count())
            as usize;
        let cols = cols.max(1);
        let display_col = self.buffer.cursor_display_col();
        if display_col < self.editor_col_offset {
            self.editor_col_offset = display_col;
        } else if display_col >= self.editor_col_offset + cols {
            self.editor_col_offset = display_col + 1 - cols;
        }
    }

    pub(super) fn scroll_editor(&mut self, delta: isize) {
        let max_offset = self
            .buffer
            .line_count()
            .saturating_sub(self.editor_rows().max(1));
        self.editor_scroll_offset = self
            .editor_scroll_offset
            .saturating_add_signed(delta)
            .min(max_offset);
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drop the toast once it has expired. Returns `true` if it was removed.
    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(String::new(), (80, 24), Theme::default())
    }
}
