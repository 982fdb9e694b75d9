//! Side-effecting toolbar actions: clipboard, download, upload and export.
//!
//! Every function here reports failure as an [`ActionError`] and never
//! touches the document or its history; the caller decides how to surface
//! the outcome.

use std::fs::{self, OpenOptions};
use std::io::{self, Write, stdout};
use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;

use crate::document::{MARKDOWN_EXTENSIONS, is_markdown_path, to_html};

/// File name used for markdown downloads.
pub const DOWNLOAD_FILE_NAME: &str = "document.md";
/// File name used for HTML exports.
pub const EXPORT_FILE_NAME: &str = "document.html";
pub const MARKDOWN_MEDIA_TYPE: &str = "text/markdown";
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// Maximum number of entries offered by the upload picker.
const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("clipboard unavailable: {reason}")]
    Clipboard { reason: String },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },
}

/// How a copy reached the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// The system clipboard accepted the text.
    System,
    /// The text was sent to the terminal as an OSC 52 escape; whether the
    /// terminal accepted it cannot be observed.
    Terminal,
}

/// Session-long handle on the system clipboard.
///
/// On X11 and Wayland the copied text is served by whoever owns the
/// `arboard::Clipboard`, so the handle has to outlive the copy. It is opened
/// on first use and kept until a write through it fails.
#[derive(Default)]
pub struct ClipboardService {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardService {
    pub const fn new() -> Self {
        Self { clipboard: None }
    }

    /// Whether a system clipboard handle is currently held.
    pub const fn is_open(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Copy `text` to the clipboard.
    ///
    /// Tries the system clipboard first and falls back to an OSC 52 escape
    /// for terminals (and SSH sessions) without a reachable clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Clipboard`] when both routes fail.
    pub fn copy(&mut self, text: &str) -> Result<CopyMethod, ActionError> {
        let system_err = match self.copy_system(text) {
            Ok(()) => return Ok(CopyMethod::System),
            Err(err) => err,
        };
        tracing::debug!(%system_err, "clipboard.system.unavailable");

        copy_to_clipboard_osc52(text)
            .map(|()| CopyMethod::Terminal)
            .map_err(|osc_err| ActionError::Clipboard {
                reason: format!("{system_err}; terminal fallback failed: {osc_err}"),
            })
    }

    fn copy_system(&mut self, text: &str) -> Result<(), arboard::Error> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let result = clipboard.set_text(text.to_owned());
        // A handle that failed is dropped and reopened on the next copy.
        if result.is_ok() {
            self.clipboard = Some(clipboard);
        }
        result
    }
}

impl std::fmt::Debug for ClipboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardService")
            .field("open", &self.is_open())
            .finish()
    }
}

fn copy_to_clipboard_osc52(text: &str) -> io::Result<()> {
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

/// Where a saved file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    pub path: PathBuf,
    pub bytes: usize,
    pub media_type: &'static str,
}

/// Save the exact document bytes as `document.md` inside `dir`.
///
/// Existing files are never replaced; the first free name out of
/// `document.md`, `document (1).md`, `document (2).md`, ... is used.
///
/// # Errors
///
/// Returns [`ActionError::Write`] if the directory or file cannot be
/// written.
pub fn download(dir: &Path, text: &str) -> Result<DownloadReceipt, ActionError> {
    save_unique(dir, DOWNLOAD_FILE_NAME, text.as_bytes(), MARKDOWN_MEDIA_TYPE)
}

/// Save the HTML rendering of `source` as `document.html` inside `dir`.
///
/// # Errors
///
/// Returns [`ActionError::Write`] if the directory or file cannot be
/// written.
pub fn export_html(dir: &Path, source: &str) -> Result<DownloadReceipt, ActionError> {
    let html = to_html(source);
    save_unique(dir, EXPORT_FILE_NAME, html.as_bytes(), HTML_MEDIA_TYPE)
}

fn save_unique(
    dir: &Path,
    file_name: &str,
    bytes: &[u8],
    media_type: &'static str,
) -> Result<DownloadReceipt, ActionError> {
    fs::create_dir_all(dir).map_err(|source| ActionError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut attempt = 0;
    loop {
        let path = dir.join(numbered_file_name(file_name, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                write_or_remove(file, &path, bytes)?;
                tracing::info!(path = %path.display(), bytes = bytes.len(), media_type, "action.save");
                return Ok(DownloadReceipt {
                    path,
                    bytes: bytes.len(),
                    media_type,
                });
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(ActionError::Write { path, source }),
        }
    }
}

/// Write `bytes` through `out`, which was just created at `path`. A failed
/// write deletes the file so no truncated copy is left behind.
fn write_or_remove(mut out: impl Write, path: &Path, bytes: &[u8]) -> Result<(), ActionError> {
    let Err(source) = out.write_all(bytes).and_then(|()| out.flush()) else {
        return Ok(());
    };
    drop(out);
    if let Err(remove_err) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %remove_err, "action.save.cleanup_failed");
    }
    Err(ActionError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `document.md` for attempt 0, then `document (1).md`, `document (2).md`...
pub fn numbered_file_name(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{file_name} ({attempt})"),
    }
}

/// Text read from a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub path: PathBuf,
    pub text: String,
    /// Whether invalid UTF-8 had to be replaced.
    pub lossy: bool,
}

/// Read the whole file at `path` as text.
///
/// Any readable file is accepted; invalid UTF-8 sequences are replaced
/// with U+FFFD.
///
/// # Errors
///
/// Returns [`ActionError::NotAFile`] for directories and
/// [`ActionError::Read`] when the file cannot be read.
pub fn upload(path: &Path) -> Result<Upload, ActionError> {
    let read_err = |source| ActionError::Read {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(read_err)?;
    if !meta.is_file() {
        return Err(ActionError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(read_err)?;
    let (text, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => {
            tracing::warn!(path = %path.display(), "upload.invalid_utf8");
            (String::from_utf8_lossy(err.as_bytes()).into_owned(), true)
        }
    };
    if !is_markdown_path(path) {
        tracing::debug!(path = %path.display(), "upload.non_markdown_extension");
    }
    Ok(Upload {
        path: path.to_path_buf(),
        text,
        lossy,
    })
}

/// Expand a leading `~/` to the home directory.
pub fn resolve_input_path(input: &str) -> PathBuf {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(trimmed)
}

/// Completions for the upload prompt.
///
/// Lists subdirectories (with a trailing `/`) and markdown files in the
/// directory part of `input` whose names start with the remaining prefix.
/// Hidden entries only show up once the prefix starts with a dot.
pub fn markdown_suggestions(input: &str) -> Vec<String> {
    let (typed_dir, prefix) = match input.rfind('/') {
        Some(idx) => input.split_at(idx + 1),
        None => ("", input),
    };
    let dir = if typed_dir.is_empty() {
        PathBuf::from(".")
    } else {
        resolve_input_path(typed_dir)
    };
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(prefix) || (name.starts_with('.') && !prefix.starts_with('.')) {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(format!("{typed_dir}{name}/"));
        } else if is_markdown_path(&path) {
            files.push(format!("{typed_dir}{name}"));
        }
    }
    dirs.sort();
    files.sort();
    files.into_iter().chain(dirs).take(MAX_SUGGESTIONS).collect()
}

/// Hint shown under the upload prompt.
pub fn accepted_extensions_hint() -> String {
    MARKDOWN_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}
