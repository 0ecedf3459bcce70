//! Persisted light state.
//!
//! The last brightness and temperature sent to the lights are stored as JSON
//! so other tools (and the `state` command) can read them back.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "LITRA_CONFIG";

/// Last values sent to the lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    /// Brightness percentage as requested (not the raw device byte).
    pub brightness: Option<i32>,
    /// Color temperature in Kelvin.
    pub temp: Option<u16>,
}

/// On-disk configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LitraConfig {
    #[serde(default)]
    pub current_state: CurrentState,
}

/// A change to the current state. Unset fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub brightness: Option<i32>,
    pub temp: Option<u16>,
}

impl StateUpdate {
    pub fn brightness(level: i32) -> Self {
        Self {
            brightness: Some(level),
            ..Self::default()
        }
    }

    pub fn temp(kelvin: u16) -> Self {
        Self {
            temp: Some(kelvin),
            ..Self::default()
        }
    }
}

impl CurrentState {
    /// Merge an update into this state.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(level) = update.brightness {
            self.brightness = Some(level);
        }
        if let Some(kelvin) = update.temp {
            self.temp = Some(kelvin);
        }
    }
}

/// Where the current state is persisted.
pub trait StateStore {
    /// Record whichever values the update carries.
    fn update_current_state(&mut self, update: StateUpdate) -> Result<()>;
}

/// Default config file: `<config dir>/litra/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir()
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;
    Ok(base.join("litra").join("config.json"))
}

/// JSON config file on disk.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Config file at the default location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config. A missing file yields defaults.
    pub fn load(&self) -> Result<LitraConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Config file missing, using defaults");
            return Ok(LitraConfig::default());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Config(format!("read {}: {e}", self.path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("parse {}: {e}", self.path.display())))
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, config: &LitraConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("serialize config: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Config(format!("write {}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}

impl StateStore for ConfigFile {
    fn update_current_state(&mut self, update: StateUpdate) -> Result<()> {
        let mut config = self.load()?;
        config.current_state.apply(update);
        self.save(&config)
    }
}

/// In-memory store, for callers that do not persist state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub state: CurrentState,
}

impl StateStore for MemoryStore {
    fn update_current_state(&mut self, update: StateUpdate) -> Result<()> {
        self.state.apply(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut state = CurrentState {
            brightness: Some(40),
            temp: Some(4000),
        };
        state.apply(StateUpdate::temp(2700));
        assert_eq!(state.brightness, Some(40));
        assert_eq!(state.temp, Some(2700));

        state.apply(StateUpdate::brightness(75));
        assert_eq!(state.brightness, Some(75));
        assert_eq!(state.temp, Some(2700));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("config.json"));
        assert_eq!(file.load().unwrap(), LitraConfig::default());
    }

    #[test]
    fn update_persists_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut file = ConfigFile::new(&path);

        file.update_current_state(StateUpdate::brightness(50)).unwrap();
        file.update_current_state(StateUpdate::temp(6500)).unwrap();

        let reopened = ConfigFile::new(&path).load().unwrap();
        assert_eq!(
            reopened.current_state,
            CurrentState {
                brightness: Some(50),
                temp: Some(6500),
            }
        );
    }

    #[test]
    fn file_without_state_section_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();
        let config = ConfigFile::new(&path).load().unwrap();
        assert_eq!(config.current_state, CurrentState::default());
    }

    #[test]
    fn corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ConfigFile::new(&path).load(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn json_shape() {
        let config = LitraConfig {
            current_state: CurrentState {
                brightness: Some(80),
                temp: None,
            },
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["current_state"]["brightness"], 80);
        assert!(value["current_state"]["temp"].is_null());
    }

    #[test]
    fn memory_store_records_updates() {
        let mut store = MemoryStore::default();
        store.update_current_state(StateUpdate::brightness(10)).unwrap();
        assert_eq!(store.state.brightness, Some(10));
        assert_eq!(store.state.temp, None);
    }
}
