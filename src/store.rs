//! Settings persistence for skywatch
//!
//! Stores user preferences (the favorites list and unit system) as JSON
//! documents in an XDG-compliant config directory, one file per namespace.
//! The weather core never touches this module; only the application shell
//! loads and saves through it.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::{Location, UnitSystem};

/// Namespace of the persisted settings document
pub const SETTINGS_NAMESPACE: &str = "settings";

/// Errors that can occur when saving settings
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failed
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted user preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Followed locations, in display order
    pub favorites: Vec<Location>,
    /// Preferred unit system
    pub units: UnitSystem,
}

/// Reads and writes namespaced JSON documents under the config directory
///
/// Uses `~/.config/skywatch/` on Linux, or the equivalent platform path.
/// A missing or unreadable document reads as absent so a corrupt file never
/// takes the application down; the next save simply rewrites it.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Directory where settings documents are stored
    config_dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store rooted at the platform config directory
    ///
    /// Returns `None` if the config directory cannot be determined (e.g. no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "skywatch")?;
        let config_dir = project_dirs.config_dir().to_path_buf();
        Some(Self { config_dir })
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    #[allow(dead_code)]
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the path of the document for the given namespace
    fn document_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(format!("{}.json", name))
    }

    /// Loads a namespaced document
    ///
    /// Returns `None` if the document doesn't exist or cannot be parsed.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let content = fs::read_to_string(self.document_path(name)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves a namespaced document, creating the config directory as needed
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.config_dir)?;

        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.document_path(name), json)?;

        Ok(())
    }
}
