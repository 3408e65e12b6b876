//! TOML-based application preferences.
//!
//! Presentation-layer knobs that do not affect engine semantics: whether
//! completed items remain visible, which kinds the default view requests,
//! and whether the launch-time rollover runs. Stored at
//! `~/.config/goalpath/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::item::ItemKind;

/// View preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_true")]
    pub show_completed: bool,
    #[serde(default = "default_kinds")]
    pub default_kinds: Vec<ItemKind>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            show_completed: default_true(),
            default_kinds: default_kinds(),
        }
    }
}

/// Rollover preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for RolloverConfig {
    fn default() -> Self {
        RolloverConfig {
            enabled: default_true(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub rollover: RolloverConfig,
}

impl AppConfig {
    /// Path to the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/goalpath"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path (for tests).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Save to an explicit path (for tests).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_kinds() -> Vec<ItemKind> {
    ItemKind::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert!(config.view.show_completed);
        assert_eq!(config.view.default_kinds.len(), 5);
        assert!(config.rollover.enabled);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.view.show_completed);
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.view.show_completed = false;
        config.view.default_kinds = vec![ItemKind::Task, ItemKind::Habit];
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!(!loaded.view.show_completed);
        assert_eq!(loaded.view.default_kinds, vec![ItemKind::Task, ItemKind::Habit]);
        assert!(loaded.rollover.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[view]\nshow_completed = false\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!(!loaded.view.show_completed);
        assert_eq!(loaded.view.default_kinds.len(), 5);
        assert!(loaded.rollover.enabled);
    }
}
