//! Storage layer for JSON persistence
//!
//! Provides consistent file I/O for all data types.

use crate::config::app::NAME;
use crate::error::{AtlasError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent writers within one process
static WRITE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Get the application config directory path
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(NAME))
        .ok_or_else(|| AtlasError::Config(
            "Could not determine config directory. HOME environment variable may not be set.".to_string()
        ))
}

/// Get path to a specific data file in the default config directory
pub fn data_path(filename: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(filename))
}

// =============================================================================
// Path-based functions (for testing and custom locations)
// =============================================================================

/// Create a directory if it doesn't exist, with proper error handling
fn create_dir_if_needed(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot create directory {:?}", path)
                }
                ErrorKind::NotFound => {
                    format!("Cannot create directory {:?}: parent path does not exist", path)
                }
                _ => {
                    format!("Failed to create directory {:?}: {}", path, e)
                }
            };
            Err(AtlasError::Storage(msg))
        }
    }
}

/// Read file contents with proper error handling
///
/// Returns `None` if the file doesn't exist.
pub(crate) fn read_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound => Ok(None),
                ErrorKind::PermissionDenied => {
                    Err(AtlasError::Storage(format!(
                        "Permission denied: cannot read {:?}", path
                    )))
                }
                _ => {
                    Err(AtlasError::Storage(format!(
                        "Failed to read {:?}: {}", path, e
                    )))
                }
            }
        }
    }
}

fn write_error(path: &Path, e: std::io::Error) -> AtlasError {
    let msg = match e.kind() {
        ErrorKind::PermissionDenied => {
            format!("Permission denied: cannot write to {:?}", path)
        }
        ErrorKind::NotFound => {
            format!("Cannot write to {:?}: parent directory does not exist", path)
        }
        ErrorKind::ReadOnlyFilesystem => {
            format!("Cannot write to {:?}: filesystem is read-only", path)
        }
        ErrorKind::StorageFull => {
            format!("Cannot write to {:?}: no space left on device", path)
        }
        _ => {
            format!("Failed to write to {:?}: {}", path, e)
        }
    };
    AtlasError::Storage(msg)
}

/// Replace a file's contents in one step
///
/// The content is written to a sibling temp file which is then renamed over
/// `path`, so readers see either the old record or the new one. Each write
/// gets its own temp file, so concurrent writers never rename each other's.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        WRITE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, content).map_err(|e| write_error(&tmp, e))?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(write_error(path, e));
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_if_needed(parent)?;
        }
    }
    Ok(())
}

/// Load data from a JSON file at a specific path
///
/// Returns `None` if the file doesn't exist.
/// Returns an error if the file exists but can't be read or parsed.
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match read_file(path)? {
        Some(c) => c,
        None => return Ok(None),
    };

    // Empty file is treated as non-existent
    if content.trim().is_empty() {
        return Ok(None);
    }

    let data = serde_json::from_str(&content).map_err(|e| {
        AtlasError::Parse(format!("Failed to parse {:?}: {}", path, e))
    })?;

    Ok(Some(data))
}

/// Save data to a JSON file at a specific path
///
/// Creates parent directories if they don't exist.
pub fn save_to<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    ensure_parent(path)?;

    let content = serde_json::to_string_pretty(data).map_err(|e| {
        AtlasError::Parse(format!("Failed to serialize data: {}", e))
    })?;

    write_file(path, &content)
}

// =============================================================================
// Convenience functions (use default config directory)
// =============================================================================

/// Load data from a JSON file in the config directory
pub fn load<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    let path = data_path(filename)?;
    load_from(&path)
}

/// Save data to a JSON file in the config directory
///
/// Creates the config directory if it doesn't exist.
pub fn save<T: Serialize>(filename: &str, data: &T) -> Result<()> {
    let path = data_path(filename)?;
    save_to(&path, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::env::temp_dir;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_path(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        temp_dir().join(format!("atlas_storage_test_{}_{}_{}.json", std::process::id(), id, name))
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        user: String,
        codes: Vec<String>,
    }

    fn record() -> Record {
        Record {
            user: "u1".to_string(),
            codes: vec!["FRA".to_string(), "DEU".to_string()],
        }
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save_load");

        save_to(&path, &record()).unwrap();
        assert!(path.exists());

        let loaded: Option<Record> = load_from(&path).unwrap();
        assert_eq!(loaded, Some(record()));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_nonexistent() {
        let path = temp_path("nonexistent");
        let loaded: Option<Record> = load_from(&path).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_load_whitespace_file() {
        let path = temp_path("blank");
        fs::write(&path, "  \n").unwrap();

        let loaded: Option<Record> = load_from(&path).unwrap();
        assert_eq!(loaded, None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<Record>> = load_from(&path);
        assert!(matches!(result, Err(AtlasError::Parse(_))));

        let _ = fs::remove_file(&path);
    }

    fn temp_dir_path(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = temp_dir().join(format!("atlas_storage_test_{}_{}_{}", std::process::id(), id, name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_replaces_and_leaves_no_temp_file() {
        let dir = temp_dir_path("replace");
        let path = dir.join("record.json");
        write_file(&path, "first").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_concurrent_writers_all_succeed() {
        let dir = temp_dir_path("concurrent");
        let path = dir.join("record.json");
        let barrier = std::sync::Barrier::new(2);

        std::thread::scope(|s| {
            for writer in ["a", "b"] {
                let path = &path;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    for round in 0..200 {
                        write_file(path, &format!("{}{}", writer, round)).unwrap();
                    }
                });
            }
        });

        let last = fs::read_to_string(&path).unwrap();
        assert!(last == "a199" || last == "b199");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_creates_parent_dirs() {
        let root = temp_dir().join(format!(
            "atlas_storage_test_dir_{}_{}",
            std::process::id(),
            TEST_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let path = root.join("nested").join("data.json");

        save_to(&path, &record()).unwrap();
        assert!(path.exists());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_error_messages_contain_path() {
        let path = temp_path("error_msg");
        fs::write(&path, "invalid json").unwrap();

        let result: Result<Option<Record>> = load_from(&path);
        let err_msg = result.unwrap_err().to_string();

        assert!(err_msg.contains("error_msg"));

        let _ = fs::remove_file(&path);
    }
}
