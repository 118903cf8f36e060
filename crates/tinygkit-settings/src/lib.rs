//! TinyGKit Settings Crate
//!
//! Handles tracker and logging configuration, and its persistence.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings, TrackerSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
