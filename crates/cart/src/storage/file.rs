//! File-backed storage backend.
//!
//! Each key maps to one file inside the data directory. Keys are sanitized so
//! that any string is a valid, non-escaping file name.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStorage, StorageError};

const VALUE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Storage that persists each key as a file under a directory.
///
/// Writes go to a temporary sibling file first and are renamed into place, so
/// a crash mid-write leaves either the old or the new value. A failed write
/// removes its temporary file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        debug!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// The directory values are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{VALUE_EXTENSION}", sanitize_key(key)))
    }
}

/// Map a key onto a safe file stem.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte is written
/// as `%XX`, which keeps distinct keys distinct.
fn sanitize_key(key: &str) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension(TEMP_EXTENSION);
        let io_err = |source: std::io::Error| StorageError::Io {
            key: key.to_owned(),
            source,
        };

        if let Err(e) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            match fs::remove_file(&tmp) {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary file");
                }
                _ => {}
            }
            return Err(io_err(e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("ecom_cart"), "ecom_cart");
        assert_eq!(sanitize_key("a/b"), "a%2Fb");
        assert_eq!(sanitize_key("../x"), "%2E%2E%2Fx");
    }

    #[test]
    fn test_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        assert_eq!(storage.get("ecom_cart").unwrap(), None);
        storage.set("ecom_cart", "[]").unwrap();
        assert_eq!(storage.get("ecom_cart").unwrap().as_deref(), Some("[]"));
        assert!(storage.path_for("ecom_cart").exists());

        storage.remove("ecom_cart").unwrap();
        assert_eq!(storage.get("ecom_cart").unwrap(), None);
        assert!(!storage.path_for("ecom_cart").exists());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.remove("missing").is_ok());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::open(dir.path())
            .unwrap()
            .set("k", "persisted")
            .unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        // A non-empty directory at the target path makes the rename fail.
        let target = storage.path_for("ecom_cart");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = storage.set("ecom_cart", "[]").unwrap_err();
        assert!(matches!(err, StorageError::Io { ref key, .. } if key == "ecom_cart"));
        assert!(!target.with_extension(TEMP_EXTENSION).exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        assert_eq!(storage.dir(), nested.as_path());
        assert!(nested.is_dir());
    }
}
