//! Tool configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so a missing
//! file, or a file naming only some fields, is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::disk_usage::DEFAULT_REFRESH_INTERVAL;
use crate::error::{ToolsError, ToolsResult};
use crate::presence::DEFAULT_THROTTLE_WINDOW;
use crate::settings::SEARCH_DEBOUNCE;
use crate::types::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Minimum spacing between presence updates
    pub throttle_window_ms: u64,
    /// Quiet period before a settings search applies
    pub search_debounce_ms: u64,
    /// Disk usage polling interval
    pub disk_refresh_secs: u64,
    /// Where exports are materialized; defaults next to the store data
    pub export_dir: Option<PathBuf>,
    /// Where session logs go; defaults under the data directory
    pub log_dir: Option<PathBuf>,
    /// Overrides the detected platform
    pub platform: Option<Platform>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            throttle_window_ms: DEFAULT_THROTTLE_WINDOW.as_millis() as u64,
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            disk_refresh_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            export_dir: None,
            log_dir: None,
            platform: None,
        }
    }
}

impl ToolsConfig {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> ToolsResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ToolsError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
            .map_err(|e| ToolsError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(raw: &str) -> ToolsResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ToolsError::Config(e.to_string()))?;
        if config.throttle_window_ms == 0 {
            return Err(ToolsError::Config(
                "throttle_window_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_window_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn disk_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.disk_refresh_secs.max(1))
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    /// Log directory, defaulting to `<data_dir>/logs`
    pub fn log_dir_or(&self, data_dir: &Path) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        let config = ToolsConfig::load(&temp.path().join("peerscope.json")).unwrap();
        assert_eq!(config, ToolsConfig::default());
        assert_eq!(config.throttle_window(), Duration::from_millis(500));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.disk_refresh_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config =
            ToolsConfig::from_json(r#"{ "throttle_window_ms": 250, "platform": "android" }"#)
                .unwrap();
        assert_eq!(config.throttle_window_ms, 250);
        assert_eq!(config.platform(), Platform::Android);
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("peerscope.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ToolsConfig::load(&path), Err(ToolsError::Config(_))));

        assert!(ToolsConfig::from_json(r#"{ "throttle_window_ms": 0 }"#).is_err());
    }

    #[test]
    fn test_log_dir_default() {
        let config = ToolsConfig::default();
        assert_eq!(
            config.log_dir_or(Path::new("/data")),
            PathBuf::from("/data/logs")
        );
    }
}
