//! Key/value storage tiers shaped like browser local and session storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Which persistence tier a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTier {
    /// Durable, written synchronously. Its result is what callers see.
    Local,
    /// Process-lifetime mirror, written asynchronously.
    Session,
    /// Backend session store, written asynchronously.
    Remote,
}

impl std::fmt::Display for StorageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Session => "session",
            Self::Remote => "remote",
        };
        write!(f, "{s}")
    }
}

/// String key/value store.
pub trait KeyValueStore: Send + Sync {
    fn tier(&self) -> StorageTier;
    fn read(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn write(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store. Used for the session tier and in tests.
pub struct MemoryStore {
    tier: StorageTier,
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(tier: StorageTier) -> Self {
        Self {
            tier,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(&self) -> SessionError {
        SessionError::Storage {
            tier: self.tier,
            message: "store lock poisoned".into(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.read().map_err(|_| self.poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().map_err(|_| self.poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// One JSON file per key under a directory. Used for the local tier.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old record or the new one.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data dir>/panegrid`, or `./.panegrid` when the platform has no data dir.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("panegrid"))
            .unwrap_or_else(|| PathBuf::from(".panegrid"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SessionError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(SessionError::Storage {
                tier: StorageTier::Local,
                message: format!("invalid storage key '{key}'"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn tier(&self) -> StorageTier {
        StorageTier::Local
    }

    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
