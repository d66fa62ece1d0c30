// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geolocation::GeolocationConfig;
use crate::seeder::SeederConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "flightscout.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `airports.json`, `territories.json` and
    /// `continents.json`. Unset means the bundled sample data.
    pub data_dir: Option<PathBuf>,
    pub seeder: SeederConfig,
    pub geolocation: GeolocationConfig,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `flightscout.json` in the platform config directory.
    pub fn new() -> Self {
        Self::at(default_config_path())
    }

    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Missing file means defaults.
    pub fn load(&self) -> Result<EngineConfig> {
        if !self.config_path.exists() {
            log::debug!(
                "[Config] {:?} not found, using defaults",
                self.config_path
            );
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
        serde_json::from_str(&content).map_err(|e| {
            log::error!("[Config] JSON parse error for {:?}: {}", self.config_path, e);
            anyhow::Error::new(e).context(format!("Failed to parse {}", CONFIG_FILE_NAME))
        })
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_path() -> PathBuf {
    ProjectDirs::from("org", "flightscout", "flightscout")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContinentCode;
    use crate::seeder::RouteConfig;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::at(dir.path().join("flightscout.json"));
        assert_eq!(manager.load().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::at(dir.path().join("nested").join("flightscout.json"));

        let mut config = EngineConfig::default();
        config.data_dir = Some(PathBuf::from("/srv/flightscout"));
        config.seeder.routes = vec![RouteConfig::new(ContinentCode::EU, None, 3)];
        config.geolocation.timeout_ms = 250;
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flightscout.json");
        fs::write(&path, r#"{"geolocation":{"timeout_ms":100,"max_age_secs":5}}"#).unwrap();

        let config = ConfigManager::at(&path).load().unwrap();
        assert_eq!(config.geolocation.timeout_ms, 100);
        assert_eq!(config.seeder, SeederConfig::default());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flightscout.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(ConfigManager::at(&path).load().is_err());
    }
}
