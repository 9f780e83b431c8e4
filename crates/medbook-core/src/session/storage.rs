//! Persistence backends for session fields.
//!
//! The file backend stores a flat JSON object at `<base>/session.json` with
//! restricted permissions (0600). Tokens are never logged.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

use crate::config::paths;

pub const KEY_ACCESS: &str = "access";
pub const KEY_REFRESH: &str = "refresh";
pub const KEY_ROLE: &str = "role";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_PATIENT_ID: &str = "patient_id";
pub const KEY_DOCTOR_ID: &str = "doctor_id";

/// Every key a session may persist; all are cleared together.
pub const SESSION_KEYS: &[&str] = &[
    KEY_ACCESS,
    KEY_REFRESH,
    KEY_ROLE,
    KEY_USER_ID,
    KEY_PATIENT_ID,
    KEY_DOCTOR_ID,
];

/// Persisted session fields (string keys to string values).
pub type SessionFields = BTreeMap<String, String>;

/// Key-value store backing the session.
pub trait SessionStorage: Send {
    /// Reads all persisted fields. Missing storage yields an empty map.
    ///
    /// # Errors
    /// Returns an error if existing storage cannot be read or parsed.
    fn load(&self) -> Result<SessionFields>;

    /// Replaces all persisted fields.
    ///
    /// # Errors
    /// Returns an error if the fields cannot be written.
    fn save(&mut self, fields: &SessionFields) -> Result<()>;

    /// Removes all persisted fields. Clearing empty storage succeeds.
    ///
    /// # Errors
    /// Returns an error if existing storage cannot be removed.
    fn clear(&mut self) -> Result<()>;
}

/// Session fields stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default location (`<base>/session.json`).
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<SessionFields> {
        if !self.path.exists() {
            return Ok(SessionFields::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(SessionFields::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn save(&mut self, fields: &SessionFields) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(fields).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// In-process storage; clones share the same fields.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    fields: Arc<Mutex<SessionFields>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with fields, as if saved by an earlier run.
    pub fn with_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            fields: Arc::new(Mutex::new(map)),
        }
    }

    pub fn snapshot(&self) -> SessionFields {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<SessionFields> {
        Ok(self.snapshot())
    }

    fn save(&mut self, fields: &SessionFields) -> Result<()> {
        *self.fields.lock().unwrap_or_else(PoisonError::into_inner) = fields.clone();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn sample_fields() -> SessionFields {
        [(KEY_ACCESS, "t1"), (KEY_ROLE, "PATIENT"), (KEY_USER_ID, "5")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_save_load_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut storage = FileStorage::new(&path);

        storage.save(&sample_fields()).unwrap();
        assert_eq!(storage.load().unwrap(), sample_fields());

        storage.clear().unwrap();
        assert!(!path.exists());
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStorage::new(&path).load().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileStorage::new(&path).save(&sample_fields()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_storage_clones_share_fields() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();
        writer.save(&sample_fields()).unwrap();
        assert_eq!(storage.snapshot(), sample_fields());
    }
}
