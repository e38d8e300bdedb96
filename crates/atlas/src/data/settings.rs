//! Application settings management
//!
//! User preferences for the command-line front end.

use crate::config::catalog::DEFAULT_SEARCH_LIMIT;
use crate::data::storage;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings data file name
const SETTINGS_FILE: &str = "settings.json";

/// Settings file format version for migrations
const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding the favorites record (config dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// User to act as when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    /// Country list (countries API v3.1 JSON) used by catalog commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countries_file: Option<PathBuf>,

    /// Maximum number of search results printed
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            data_dir: None,
            default_user: None,
            countries_file: None,
            search_limit: default_search_limit(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from the config directory, defaults if absent
    pub fn load() -> Result<Self> {
        Ok(storage::load(SETTINGS_FILE)?.unwrap_or_default())
    }

    /// Load settings from a specific path, defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(storage::load_from(path)?.unwrap_or_default())
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<()> {
        storage::save(SETTINGS_FILE, self)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        storage::save_to(path, self)
    }

    /// Directory for the favorites record
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => storage::config_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        temp_dir().join(format!("atlas_settings_test_{}_{}.json", std::process::id(), id))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.version, SETTINGS_VERSION);
        assert_eq!(settings.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(settings.default_user.is_none());
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(&temp_path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path();
        fs::write(&path, r#"{ "default_user": "u1" }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.default_user.as_deref(), Some("u1"));
        assert_eq!(settings.search_limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(settings.version, SETTINGS_VERSION);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path();
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/atlas-data")),
            default_user: Some("u1".to_string()),
            countries_file: Some(PathBuf::from("countries.json")),
            search_limit: 10,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unset_fields_not_serialized() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("data_dir"));
        assert!(!json.contains("default_user"));
    }

    #[test]
    fn test_corrupted_file_is_error() {
        let path = temp_path();
        fs::write(&path, "{{{").unwrap();
        assert!(Settings::load_from(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_resolved_data_dir_prefers_explicit() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/srv/atlas")),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_data_dir().unwrap(), PathBuf::from("/srv/atlas"));
    }
}
