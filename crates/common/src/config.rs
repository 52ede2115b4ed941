//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TapwiseError, TapwiseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gesture recognition parameters.
    #[serde(default)]
    pub gestures: GestureSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// User-facing gesture parameters.
///
/// Distances are in display units, times in seconds. Optional fields are
/// derived from the display size when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Display width used to derive the default movement threshold.
    pub display_width: f64,

    /// Display height used to derive the default movement threshold.
    pub display_height: f64,

    /// Distance a touch must travel from its origin to count as moved.
    /// Defaults to a tenth of the display diagonal.
    pub movement_threshold: Option<f64>,

    /// Maximum gap between two taps of a double tap.
    pub double_tap_window_secs: f64,

    /// Maximum distance between two taps of a double tap.
    /// Defaults to the movement threshold.
    pub double_tap_distance: Option<f64>,

    /// How often idle touches are checked for holds.
    pub hold_poll_interval_secs: f64,

    /// How long an unmoved touch must stay down to become a hold.
    pub hold_trigger_secs: f64,

    /// Moves that end faster than this are flicks; slower ones are swipes.
    pub flick_boundary_secs: f64,

    /// Track every finger. When false only identifier 0 is processed.
    pub multitap: bool,

    /// Recognize two-finger pinches.
    pub pinch: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tapwise_classifier=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            display_width: 960.0,
            display_height: 640.0,
            movement_threshold: None,
            double_tap_window_secs: 0.25,
            double_tap_distance: None,
            hold_poll_interval_secs: 0.1,
            hold_trigger_secs: 1.0,
            flick_boundary_secs: 0.25,
            multitap: true,
            pinch: true,
        }
    }
}

impl GestureSettings {
    /// Diagonal length of the configured display.
    pub fn display_diagonal(&self) -> f64 {
        self.display_width.hypot(self.display_height)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "Failed to load config");
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> TapwiseResult<Self> {
        if !path.exists() {
            return Err(TapwiseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the standard location, returning the path written.
    pub fn save(&self) -> TapwiseResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> TapwiseResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tapwise").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let raw = r#"{ "gestures": { "hold_trigger_secs": 0.5, "multitap": false } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.gestures.hold_trigger_secs, 0.5);
        assert!(!config.gestures.multitap);
        assert_eq!(config.gestures.double_tap_window_secs, 0.25);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_display_diagonal() {
        let settings = GestureSettings {
            display_width: 300.0,
            display_height: 400.0,
            ..Default::default()
        };
        assert!((settings.display_diagonal() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("tapwise_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.gestures.movement_threshold = Some(12.0);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.gestures, config.gestures);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("tapwise_definitely_missing.json");
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, TapwiseError::FileNotFound { .. }));
    }
}
