//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, ToastLevel, UploadPrompt};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::Theme;
use crate::document::WELCOME_DOCUMENT;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    seed: String,
    file_label: String,
    theme: Theme,
    download_dir: PathBuf,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application editing `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            file_label: "untitled".to_string(),
            theme: Theme::default(),
            download_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Create an application showing the built-in welcome document.
    pub fn welcome() -> Self {
        Self::new(WELCOME_DOCUMENT).with_file_label("welcome")
    }

    /// Name shown in the status bar.
    pub fn with_file_label(mut self, label: impl Into<String>) -> Self {
        self.file_label = label.into();
        self
    }

    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Directory that receives downloads and HTML exports.
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Build the initial model for a terminal of the given size.
    pub fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(self.seed.clone(), terminal_size, self.theme);
        model.file_label.clone_from(&self.file_label);
        model.download_dir.clone_from(&self.download_dir);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }
}

#[cfg(test)]
mod tests;
