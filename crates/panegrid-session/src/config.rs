//! Session configuration, loaded from TOML.
//!
//! Every field has a default, so an empty or missing file yields a usable
//! configuration:
//!
//! ```toml
//! autosave = true
//!
//! [storage]
//! dir = "/var/lib/panegrid"
//! layouts_key = "panegrid_layouts"
//!
//! [remote]
//! enabled = true
//! addr = "127.0.0.1:9370"
//!
//! [diagnostics]
//! capacity = 256
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SessionError;

pub const DEFAULT_LAYOUTS_KEY: &str = "panegrid_layouts";
pub const DEFAULT_MODULES_KEY: &str = "panegrid_active_modules";
pub const DEFAULT_SESSION_KEY: &str = "panegrid_session";
pub const DEFAULT_REMOTE_ADDR: &str = "127.0.0.1:9370";
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Persist after every add/remove made through the manager.
    pub autosave: bool,
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            storage: StorageConfig::default(),
            remote: RemoteConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the local file store. `None` means the platform data dir.
    pub dir: Option<PathBuf>,
    pub layouts_key: String,
    pub modules_key: String,
    pub session_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            layouts_key: DEFAULT_LAYOUTS_KEY.to_string(),
            modules_key: DEFAULT_MODULES_KEY.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub addr: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: DEFAULT_REMOTE_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Events kept by the in-memory diagnostics log.
    pub capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// `<config dir>/panegrid/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("panegrid").join("config.toml"))
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, or from the default path when `None`.
    ///
    /// A missing file yields the default config; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SessionError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_toml_file(&path)?;
        tracing::info!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    /// Like [`SessionConfig::load`], but logs and falls back to defaults on error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid session config, using defaults");
            Self::default()
        })
    }

    /// Local store directory, resolved against the platform default.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .unwrap_or_else(crate::store::FileStore::default_dir)
    }

    fn validate(&self) -> Result<(), SessionError> {
        let keys = [
            ("layouts_key", &self.storage.layouts_key),
            ("modules_key", &self.storage.modules_key),
            ("session_key", &self.storage.session_key),
        ];
        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(SessionError::Config(format!("storage.{name} must not be empty")));
            }
        }
        let distinct: std::collections::HashSet<&String> = keys.iter().map(|(_, k)| *k).collect();
        if distinct.len() != keys.len() {
            return Err(SessionError::Config("storage keys must be distinct".into()));
        }
        if self.remote.enabled && self.remote.addr.trim().is_empty() {
            return Err(SessionError::Config("remote.addr is required when remote is enabled".into()));
        }
        if self.diagnostics.capacity == 0 {
            return Err(SessionError::Config("diagnostics.capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert!(config.autosave);
        assert!(!config.remote.enabled);
        assert_eq!(config.storage.layouts_key, "panegrid_layouts");
    }

    #[test]
    fn test_partial_sections() {
        let config = SessionConfig::from_toml_str(
            r#"
            autosave = false

            [storage]
            dir = "/tmp/panegrid-test"
            session_key = "sess"

            [remote]
            enabled = true
            addr = "10.0.0.2:9000"
            "#,
        )
        .unwrap();
        assert!(!config.autosave);
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/panegrid-test"));
        assert_eq!(config.storage.session_key, "sess");
        assert_eq!(config.storage.modules_key, DEFAULT_MODULES_KEY);
        assert_eq!(config.remote.addr, "10.0.0.2:9000");
        assert_eq!(config.diagnostics.capacity, DEFAULT_DIAGNOSTICS_CAPACITY);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SessionConfig::from_toml_str("[storage]\nlayouts_key = \"\""),
            Err(SessionError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[storage]\nlayouts_key = \"x\"\nmodules_key = \"x\""),
            Err(SessionError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("[diagnostics]\ncapacity = 0"),
            Err(SessionError::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("autosave = \"yes\""),
            Err(SessionError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_load_or_default_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "autosave = 3").unwrap();
        assert!(SessionConfig::load(Some(&path)).is_err());
        assert_eq!(SessionConfig::load_or_default(Some(&path)), SessionConfig::default());
    }
}
