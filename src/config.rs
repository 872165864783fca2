//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::consts::{DEFAULT_EXPORT_PIXEL_RATIO, DEFAULT_EXPORT_SETTLE_MS};
use crate::error::ErrorCode;
use crate::export::ExportOptions;

pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

pub const ENV_EXPORT_PIXEL_RATIO: &str = "LAYERBOARD_EXPORT_PIXEL_RATIO";
pub const ENV_EXPORT_SETTLE_MS: &str = "LAYERBOARD_EXPORT_SETTLE_MS";
pub const ENV_SNAPSHOT_DIR: &str = "LAYERBOARD_SNAPSHOT_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        "E_CONFIG_INVALID"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub export: ExportOptions,
    pub snapshot_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { export: ExportOptions::default(), snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR) }
    }
}

impl EditorConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `LAYERBOARD_EXPORT_PIXEL_RATIO`: output pixels per board unit, default 30
    /// - `LAYERBOARD_EXPORT_SETTLE_MS`: batch settle delay, default 50
    /// - `LAYERBOARD_SNAPSHOT_DIR`: file snapshot directory, default `snapshots`
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if a variable is set but doesn't parse, or the pixel
    /// ratio is not a positive finite number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let pixel_ratio: f64 = env_parse(ENV_EXPORT_PIXEL_RATIO, DEFAULT_EXPORT_PIXEL_RATIO)?;
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ConfigError::Invalid { key: ENV_EXPORT_PIXEL_RATIO, value: pixel_ratio.to_string() });
        }
        let settle_ms: u64 = env_parse(ENV_EXPORT_SETTLE_MS, DEFAULT_EXPORT_SETTLE_MS)?;
        let snapshot_dir = std::env::var(ENV_SNAPSHOT_DIR).unwrap_or_else(|_| DEFAULT_SNAPSHOT_DIR.to_string());

        Ok(Self {
            export: ExportOptions { pixel_ratio, settle_delay: Duration::from_millis(settle_ms) },
            snapshot_dir: PathBuf::from(snapshot_dir),
        })
    }
}

/// Parse `key` if set, otherwise return `default`.
fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}
