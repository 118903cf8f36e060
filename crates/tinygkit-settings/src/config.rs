//! Configuration management for TinyGKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Tracker settings (footer policy, notification fan-out)
//! - Logging settings (level, output format)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tinygkit_core::FooterPolicy;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Log levels accepted by [`LoggingSettings::level`]
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Machine-state tracker settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerSettings {
    /// When footer notifications are emitted
    pub footer_policy: FooterPolicy,
    /// Capacity of the notification channels (replay logger, dispatcher)
    pub notification_capacity: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            footer_policy: FooterPolicy::EveryFrame,
            notification_capacity: 100,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter level, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Tracker settings
    pub tracker: TrackerSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or_default().to_string()).into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/tinygkit/config.toml`
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
        })?;
        Ok(dir.join("tinygkit").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.tracker.notification_capacity == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "tracker.notification_capacity".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValueOutOfRange {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.tracker.footer_policy, FooterPolicy::EveryFrame);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = Config::new();
        config.tracker.notification_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let mut config = Config::new();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[tracker]\nfooter_policy = \"on_change\"\n").unwrap();
        assert_eq!(config.tracker.footer_policy, FooterPolicy::OnChange);
        assert_eq!(config.tracker.notification_capacity, 100);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_default_path_file_name() {
        if let Ok(path) = Config::default_config_path() {
            assert!(path.ends_with("tinygkit/config.toml"));
        }
    }
}
