//! Application configuration (`~/.strategic-2048/config.toml`).
//!
//! ```toml
//! database = "/home/me/.strategic-2048/game_data.db"
//! history_capacity = 10
//! seed = 42
//! ```
//!
//! Every key is optional. A missing file means defaults; an unreadable or
//! malformed file is logged and ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::SessionConfig;
use crate::types::DEFAULT_HISTORY_CAPACITY;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "STRATEGIC_2048_CONFIG";

const APP_DIR: &str = ".strategic-2048";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "game_data.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub database: Option<PathBuf>,
    pub history_capacity: Option<usize>,
    pub seed: Option<u32>,
}

impl AppConfig {
    /// Load from `explicit`, else `$STRATEGIC_2048_CONFIG`, else the home directory
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(default_config_path)
        else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(Some(config)) => {
                tracing::debug!(path = %path.display(), "config loaded");
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                tracing::warn!("Ignoring config at {}: {:#}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Ok(None) when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
            .map(Some)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configured database path, else `~/.strategic-2048/game_data.db`
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(default_database_path)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            history_capacity: self.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY),
            seed: self.seed,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join(DATABASE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.session_config(),
            SessionConfig {
                history_capacity: 10,
                seed: None
            }
        );
    }

    #[test]
    fn test_all_keys() {
        let config = AppConfig::parse(
            r#"
            database = "/tmp/progress.db"
            history_capacity = 3
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path(), Some(PathBuf::from("/tmp/progress.db")));
        assert_eq!(config.session_config().history_capacity, 3);
        assert_eq!(config.session_config().seed, Some(42));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AppConfig::parse("difficulty = 'hard'").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load_from(&path).unwrap().is_none());
        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "history_capacity = \"lots\"").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
    }
}
