//! External key-value store
//!
//! A flat string-to-string map persisted as a single JSON file in the
//! config directory. This is the app's localStorage equivalent: the
//! settings and location stores persist through it but treat it as an
//! external service, so read/parse failures degrade to "no value".

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::config::APP_NAME;

/// Store file name inside the config directory
const STORE_FILE: &str = "store.json";

/// File-backed key-value store with whole-file read/write per operation
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Creates a store at the platform config directory
    /// (`~/.config/skycast/store.json` on Linux).
    ///
    /// Returns `None` if the config directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME)?;
        Some(Self {
            path: project_dirs.config_dir().join(STORE_FILE),
        })
    }

    /// Creates a store at a custom file path (used by tests)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the current map; a missing or unreadable file is an empty map
    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Writes the map back to disk, creating parent directories as needed
    fn save(&self, map: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    /// Returns the stored value for a key, if any
    pub fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    /// Stores a value under a key, overwriting any previous value
    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    /// Removes a key; removing an absent key is not an error
    pub fn remove(&self, key: &str) -> io::Result<()> {
        let mut map = self.load();
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}
