//! Application configuration.

use handlens_landmark_model::detection::DetectionMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{HandlensError, HandlensResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display geometry defaults used until a real measurement arrives.
    pub display: DisplayDefaults,

    /// Detection defaults.
    pub detection: DetectionDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Display defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayDefaults {
    /// Preview width in pixels.
    pub width: f64,

    /// Mirror the preview horizontally (selfie view). Only consulted on
    /// platforms where the camera facing does not decide it.
    pub mirror: bool,
}

/// Detection defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionDefaults {
    pub mode: DetectionMode,

    /// Upper bound on frames handed to the detector per second (0 = unbounded).
    pub target_fps: u32,

    /// Source platform name (android, ios, web, desktop).
    pub platform: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handlens=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Append log output to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self {
            width: 720.0,
            mirror: true,
        }
    }
}

impl Default for DetectionDefaults {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Landmarks,
            target_fps: 30,
            platform: "desktop".to_string(),
        }
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
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> HandlensResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> HandlensResult<()> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }

    /// Reject values that can never produce a usable overlay.
    pub fn validate(&self) -> HandlensResult<()> {
        if !self.display.width.is_finite() || self.display.width < 0.0 {
            return Err(HandlensError::config(format!(
                "display width must be a non-negative number, got {}",
                self.display.width
            )));
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("handlens").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "detection": { "mode": "gesture" } }"#).unwrap();
        assert_eq!(config.detection.mode, DetectionMode::Gesture);
        assert_eq!(config.detection.target_fps, 30);
        assert_eq!(config.display.width, 720.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_negative_width_rejected() {
        let mut config = AppConfig::default();
        config.display.width = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("handlens-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "display": { "width": 400.0, "mirror": false } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.display.width, 400.0);
        assert!(!config.display.mirror);

        std::fs::remove_dir_all(&dir).ok();
    }
}
