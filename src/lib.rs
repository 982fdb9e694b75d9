// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A split-pane markdown editor for the terminal.
//!
//! Markpad shows the markdown source on the left and a live rendered
//! preview on the right, with:
//! - Per-keystroke undo history
//! - Light and dark themes
//! - Copy to clipboard, download to disk, and upload from disk
//! - HTML export
//!
//! ## Architecture
//!
//! Markpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`history`]: Linear snapshot history
//! - [`editor`]: Text buffer and cursor
//! - [`document`]: Markdown rendering for the preview
//! - [`highlight`]: Syntax highlighting
//! - [`actions`]: Clipboard, download and upload
//! - [`ui`]: Terminal UI components
//! - [`config`]: Themes and saved defaults

pub mod actions;
pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod history;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::config::Theme;
    pub use crate::document::Preview;
    pub use crate::history::EditHistory;
    pub use crate::ui::viewport::Viewport;
}
