//! Configuration loading and management
//!
//! Handles parsing of `config.toml` from the user config directory (or an
//! explicit `--config` path). Only display preferences live here; tasks are
//! never written to disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::Section;
use crate::theme::Theme;

pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Terminal UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme
    #[serde(default)]
    pub theme: Theme,

    /// Section selected at startup
    #[serde(default)]
    pub default_section: Section,

    /// strftime pattern used to display due dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_date_format() -> String {
    "%b %-d, %Y".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            default_section: Section::default(),
            date_format: default_date_format(),
        }
    }
}

impl UiConfig {
    fn validate(&self) -> Result<()> {
        let format = self.date_format.trim();
        if format.is_empty() {
            return Err(Error::InvalidConfig(
                "ui.date_format cannot be empty".to_string(),
            ));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidConfig(format!(
                "ui.date_format: invalid strftime pattern '{format}'"
            )));
        }
        // Time and zone specifiers are valid strftime but cannot render a date.
        let mut rendered = String::new();
        let sample = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap_or_default();
        if write!(rendered, "{}", sample.format(format)).is_err() {
            return Err(Error::InvalidConfig(format!(
                "ui.date_format: '{format}' cannot format a calendar date"
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Default config path under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tasklist").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. The default path is optional and falls
    /// back to built-in defaults when absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            debug!(path = %path.display(), "loading config");
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config");
                Ok((Self::load(&path)?, Some(path)))
            }
            _ => {
                debug!("no config file, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.ui.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.ui.theme, Theme::Classic);
        assert_eq!(cfg.ui.default_section, Section::All);
        assert_eq!(cfg.ui.date_format, "%b %-d, %Y");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[ui]
theme = "modern"
default_section = "pending"
date_format = "%Y/%m/%d"
"#,
        )
        .expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.ui.theme, Theme::Modern);
        assert_eq!(cfg.ui.default_section, Section::Pending);
        assert_eq!(cfg.ui.date_format, "%Y/%m/%d");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\ntheme = \"modern\"\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.ui.theme, Theme::Modern);
        assert_eq!(cfg.ui.default_section, Section::All);
        assert_eq!(cfg.ui.date_format, default_date_format());
    }

    #[test]
    fn unknown_theme_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\ntheme = \"neon\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_date_format_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\ndate_format = \"  \"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn time_only_date_format_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\ndate_format = \"%H:%M\"\n").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(message) => assert!(message.contains("%H:%M")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn resolve_requires_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.toml");
        let err = Config::resolve(Some(&missing)).expect_err("missing config");
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("theme = \"classic\""));
        assert!(written.contains("default_section = \"all\""));
        assert_eq!(Config::load(&path).expect("reload"), cfg);
    }
}
