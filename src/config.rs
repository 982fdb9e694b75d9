//! Command-line defaults and the editor theme flag.
//!
//! Defaults live in a plain text file holding one flag per line, the same
//! syntax as the command line. A global file is merged with a local
//! `.markpadrc`, and explicit command-line flags win over both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The editor colour scheme.
///
/// Purely cosmetic: toggling it never touches the document or its history.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Guess the terminal background from `COLORFGBG` (`fg;bg`).
    pub fn detect() -> Self {
        theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }
}

/// Startup theme selection.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn resolve(self) -> Theme {
        match self {
            Self::Auto => Theme::detect(),
            Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
        }
    }
}

fn theme_from_colorfgbg(value: Option<&str>) -> Theme {
    let Some(value) = value else {
        return Theme::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(bg) if bg >= 7 && bg != 8 => Theme::Light,
        _ => Theme::Dark,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub theme: Option<ThemeMode>,
    pub download_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` take precedence.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            theme: other.theme.or(self.theme),
            download_dir: other
                .download_dir
                .clone()
                .or_else(|| self.download_dir.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    PathBuf::from(".markpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpadrc")
}

/// Load flags from a defaults file; a missing file yields no flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Split a config line into its flag and value. Each line holds one flag,
/// and everything after the first run of whitespace is the value, so paths
/// with spaces survive unquoted.
fn line_tokens(line: &str) -> Vec<String> {
    match line.split_once(char::is_whitespace) {
        Some((flag, value)) if !flag.contains('=') => {
            vec![flag.to_string(), value.trim().to_string()]
        }
        _ => vec![line.to_string()],
    }
}

/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markpad defaults (saved with --save)".to_string()];
    if let Some(theme) = flags.theme {
        let name = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {name}"));
    }
    if let Some(dir) = &flags.download_dir {
        lines.push(format!("--download-dir {}", dir.display()));
    }
    if let Some(file) = &flags.log_file {
        lines.push(format!("--log-file {}", file.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module persists out of a raw argument list.
///
/// Unknown tokens (the program name, positional files, other flags) are
/// skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (token, None),
        };
        if matches!(name, "--theme" | "--download-dir" | "--log-file") {
            let value = inline_value.or_else(|| {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                next
            });
            if let Some(value) = value {
                match name {
                    "--theme" => flags.theme = parse_theme(&value),
                    "--download-dir" => flags.download_dir = Some(PathBuf::from(value)),
                    _ => flags.log_file = Some(PathBuf::from(value)),
                }
            }
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_theme_double_toggle_is_identity() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_ne!(theme.toggled(), theme);
            assert_eq!(theme.toggled().toggled(), theme);
        }
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert_eq!(theme_from_colorfgbg(Some("15;0")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(Some("0;15")), Theme::Light);
        assert_eq!(theme_from_colorfgbg(Some("0;default;15")), Theme::Light);
        assert_eq!(theme_from_colorfgbg(Some("garbage")), Theme::Dark);
        assert_eq!(theme_from_colorfgbg(None), Theme::Dark);
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "markpad",
            "notes.md",
            "--theme",
            "light",
            "--download-dir=out",
            "--log-file",
            "markpad.log",
        ]));
        assert_eq!(flags.theme, Some(ThemeMode::Light));
        assert_eq!(flags.download_dir, Some(PathBuf::from("out")));
        assert_eq!(flags.log_file, Some(PathBuf::from("markpad.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_unknown_theme() {
        let flags = parse_flag_tokens(&args(&["--theme=sepia"]));
        assert_eq!(flags.theme, None);
    }

    #[test]
    fn test_parse_flag_tokens_tolerates_missing_value() {
        let flags = parse_flag_tokens(&args(&["--download-dir"]));
        assert_eq!(flags.download_dir, None);
    }

    #[test]
    fn test_config_lines_keep_spaces_in_values() {
        assert_eq!(
            line_tokens("--download-dir /home/u/My Documents"),
            args(&["--download-dir", "/home/u/My Documents"])
        );
        assert_eq!(
            line_tokens("--log-file=/tmp/a b.log"),
            args(&["--log-file=/tmp/a b.log"])
        );
        assert_eq!(line_tokens("--theme   dark "), args(&["--theme", "dark"]));
    }

    #[test]
    fn test_saved_paths_with_spaces_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let flags = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            download_dir: Some(PathBuf::from("/home/u/My Documents")),
            log_file: Some(PathBuf::from("/var/log/mark pad.log")),
        };
        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);
    }

    #[test]
    fn test_config_union_prefers_other() {
        let file = ConfigFlags {
            theme: Some(ThemeMode::Light),
            download_dir: Some(PathBuf::from("a")),
            log_file: None,
        };
        let cli = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert_eq!(merged.download_dir, Some(PathBuf::from("a")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            theme: Some(ThemeMode::Auto),
            download_dir: Some(PathBuf::from("downloads")),
            log_file: Some(PathBuf::from("markpad.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
