//! Markpad - A split-pane markdown editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! markpad
//! markpad notes.md
//! markpad --theme light --download-dir ~/Downloads notes.md
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use markpad::app::App;
use markpad::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};

const LOG_FILTER_ENV: &str = "MARKPAD_LOG";
const LOG_FILE_ENV: &str = "MARKPAD_LOG_FILE";

/// A split-pane markdown editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to start from (defaults to a welcome document)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Colour theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Directory that receives downloads and HTML exports
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Write log events to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the log subscriber.
///
/// The terminal belongs to the TUI, so events only go to stderr when
/// `MARKPAD_LOG` is set explicitly and no log file was given.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(log_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if std::env::var_os(LOG_FILTER_ENV).is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(log_filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn read_seed(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        theme: cli.theme,
        download_dir: cli.download_dir.clone(),
        log_file: cli.log_file.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_file = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    init_logging(log_file.as_deref())?;

    let theme = effective.theme.unwrap_or(ThemeMode::Auto).resolve();
    let download_dir = effective
        .download_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let app = match &cli.file {
        Some(path) => {
            let label = path.file_name().map_or_else(
                || path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            App::new(read_seed(path)?).with_file_label(label)
        }
        None => App::welcome(),
    };
    let mut app = app
        .with_theme(theme)
        .with_download_dir(download_dir)
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    app.run().context("Application error")
}
