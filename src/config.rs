//! Configuration loading and management
//!
//! Handles parsing of `config.toml` files stored alongside the board data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::task::Priority;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Priority assigned to new tasks when none is given
    #[serde(default)]
    pub default_priority: Priority,

    /// How many days ahead the reminders view scans for upcoming deadlines
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: i64,

    /// How many days the completion trend covers
    #[serde(default = "default_trend_days")]
    pub trend_days: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_priority: Priority::default(),
            upcoming_days: default_upcoming_days(),
            trend_days: default_trend_days(),
        }
    }
}

fn default_upcoming_days() -> i64 {
    3
}

fn default_trend_days() -> usize {
    7
}

impl Config {
    /// Load configuration from a `config.toml` file
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the board directory, or return defaults
    pub fn load_from_board(board_dir: &PathBuf) -> Self {
        let config_path = board_dir.join("config.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.upcoming_days < 1 {
            return Err(crate::error::Error::InvalidConfig(
                "upcoming_days must be >= 1".to_string(),
            ));
        }
        if self.upcoming_days > 365 {
            return Err(crate::error::Error::InvalidConfig(
                "upcoming_days must be <= 365".to_string(),
            ));
        }
        if self.trend_days < 1 {
            return Err(crate::error::Error::InvalidConfig(
                "trend_days must be >= 1".to_string(),
            ));
        }
        if self.trend_days > 365 {
            return Err(crate::error::Error::InvalidConfig(
                "trend_days must be <= 365".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.default_priority, Priority::Medium);
        assert_eq!(cfg.upcoming_days, 3);
        assert_eq!(cfg.trend_days, 7);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let content = r#"
default_priority = "high"
upcoming_days = 14
trend_days = 30
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.default_priority, Priority::High);
        assert_eq!(cfg.upcoming_days, 14);
        assert_eq!(cfg.trend_days, 30);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "upcoming_days = 7").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.default_priority, Priority::Medium);
        assert_eq!(cfg.upcoming_days, 7);
        assert_eq!(cfg.trend_days, 7);
    }

    #[test]
    fn invalid_upcoming_days_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "upcoming_days = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_trend_days_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "trend_days = 400").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_from_board_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_board(&dir.path().to_path_buf());
        assert_eq!(cfg.upcoming_days, 3);
    }

    #[test]
    fn load_from_board_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_priority = \"low\"").expect("write config");

        let cfg = Config::load_from_board(&dir.path().to_path_buf());
        assert_eq!(cfg.default_priority, Priority::Low);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("default_priority = \"medium\""));
        assert!(written.contains("upcoming_days = 3"));
    }
}
