//! Application configuration

use anyhow::Result;
use chrono_tz::Tz;
use line_watchface_types::{DeviceCapabilities, Preferences};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// User facing watch face preferences
    #[serde(default)]
    pub preferences: Preferences,
    /// Display capabilities; the centre is recomputed from `surface`
    #[serde(default)]
    pub device: DeviceCapabilities,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default = "default_time_zone")]
    pub time_zone: Tz,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_time_zone() -> Tz {
    Tz::UTC
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "line-watchface", "line-watchface")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Device capabilities centred on the configured surface
    pub fn capabilities(&self) -> DeviceCapabilities {
        self.device
            .with_surface(self.surface.width, self.surface.height)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            device: DeviceCapabilities::default(),
            surface: SurfaceConfig::default(),
            time_zone: default_time_zone(),
        }
    }
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 454,
            height: 454,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use line_watchface_types::StyleMode;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.time_zone, Tz::UTC);
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = std::env::temp_dir().join(format!("line-watchface-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.preferences.style_mode = StyleMode::Analog;
        config.time_zone = "Europe/Berlin".parse().unwrap();
        config.surface = SurfaceConfig {
            width: 390,
            height: 390,
        };
        config.save_to_path(&path).unwrap();

        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.capabilities().screen_center.x, 195.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("line-watchface-does-not-exist.json");
        assert!(AppConfig::load_from_path(&missing).is_err());
    }
}
