//! Layout records on top of a [`KeyValueStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use panegrid_layout::{hydrate_layout, is_valid_layout, Layout, ModuleInstanceId};

use crate::config::StorageConfig;
use crate::store::{KeyValueStore, StorageTier};
use crate::SessionError;

/// Names of the three records kept in each tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub layouts: String,
    pub modules: String,
    pub session: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for StorageKeys {
    fn from(config: &StorageConfig) -> Self {
        Self {
            layouts: config.layouts_key.clone(),
            modules: config.modules_key.clone(),
            session: config.session_key.clone(),
        }
    }
}

/// Layout and module list saved together, as fetched from a remote session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub grid_layout: Layout,
    pub active_modules: Vec<ModuleInstanceId>,
    pub saved_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn new(grid_layout: Layout, active_modules: Vec<ModuleInstanceId>) -> Self {
        Self {
            grid_layout,
            active_modules,
            saved_at: Utc::now(),
        }
    }
}

/// Reads and writes layout records in one storage tier.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn tier(&self) -> StorageTier {
        self.store.tier()
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn save_layout(&self, layout: &Layout) -> Result<(), SessionError> {
        let json = serde_json::to_string(layout)?;
        self.store.write(&self.keys.layouts, &json)
    }

    pub fn save_modules(&self, modules: &[ModuleInstanceId]) -> Result<(), SessionError> {
        let json = serde_json::to_string(modules)?;
        self.store.write(&self.keys.modules, &json)
    }

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let json = serde_json::to_string(snapshot)?;
        self.store.write(&self.keys.session, &json)
    }

    /// The stored layout, repaired and validated.
    ///
    /// `Ok(None)` when nothing is stored or the record is unusable; the
    /// latter is logged. Store failures are returned.
    pub fn load_layout(&self) -> Result<Option<Layout>, SessionError> {
        let Some(raw) = self.store.read(&self.keys.layouts)? else {
            return Ok(None);
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(tier = %self.tier(), error = %e, "Stored layout is not JSON");
                return Ok(None);
            }
        };
        let hydrated = hydrate_layout(&value);
        if !is_valid_layout(&hydrated) {
            tracing::warn!(tier = %self.tier(), "Stored layout failed validation");
            return Ok(None);
        }
        Ok(Layout::from_value(&hydrated).ok())
    }

    /// The stored module list. Non-string entries are dropped; a record
    /// that is not an array is treated as absent.
    pub fn load_modules(&self) -> Result<Option<Vec<ModuleInstanceId>>, SessionError> {
        let Some(raw) = self.store.read(&self.keys.modules)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => Ok(Some(
                entries
                    .into_iter()
                    .filter_map(|e| match e {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            Ok(_) => {
                tracing::warn!(tier = %self.tier(), "Stored module list is not an array");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(tier = %self.tier(), error = %e, "Stored module list is not JSON");
                Ok(None)
            }
        }
    }

    pub fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, SessionError> {
        let Some(raw) = self.store.read(&self.keys.session)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(tier = %self.tier(), error = %e, "Stored session snapshot is malformed");
                Ok(None)
            }
        }
    }

    /// Removes all three records. Every removal is attempted; the first
    /// failure is returned.
    pub fn clear(&self) -> Result<(), SessionError> {
        let results = [
            self.store.remove(&self.keys.layouts),
            self.store.remove(&self.keys.modules),
            self.store.remove(&self.keys.session),
        ];
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use panegrid_layout::LayoutItem;

    fn adapter() -> (Arc<MemoryStore>, PersistenceAdapter) {
        let store = Arc::new(MemoryStore::new(StorageTier::Local));
        let adapter = PersistenceAdapter::new(store.clone(), StorageKeys::default());
        (store, adapter)
    }

    #[test]
    fn test_layout_roundtrip() {
        let (_, adapter) = adapter();
        let mut layout = Layout::empty();
        layout.lg.push(LayoutItem::new("A", 0, 0, 3, 4));
        adapter.save_layout(&layout).unwrap();
        assert_eq!(adapter.load_layout().unwrap(), Some(layout));
    }

    #[test]
    fn test_load_layout_repairs_dict_breakpoints() {
        let (store, adapter) = adapter();
        store
            .write(
                "panegrid_layouts",
                r#"{"lg": {"0": {"i": "A", "x": 0, "y": 0, "w": 3, "h": 4}}}"#,
            )
            .unwrap();
        let layout = adapter.load_layout().unwrap().unwrap();
        assert_eq!(layout.lg[0].id, "A");
        assert!(layout.md.is_empty());
    }

    #[test]
    fn test_load_layout_rejects_garbage() {
        let (store, adapter) = adapter();
        store.write("panegrid_layouts", "not json").unwrap();
        assert_eq!(adapter.load_layout().unwrap(), None);
        store.write("panegrid_layouts", r#"{"lg": [{"id": "A"}]}"#).unwrap();
        assert_eq!(adapter.load_layout().unwrap(), None);
    }

    #[test]
    fn test_modules_drop_non_strings() {
        let (store, adapter) = adapter();
        store.write("panegrid_active_modules", r#"["A", 3, null, "B"]"#).unwrap();
        assert_eq!(adapter.load_modules().unwrap(), Some(vec!["A".to_string(), "B".to_string()]));
        store.write("panegrid_active_modules", r#"{"0": "A"}"#).unwrap();
        assert_eq!(adapter.load_modules().unwrap(), None);
    }

    #[test]
    fn test_snapshot_uses_camel_case() {
        let (store, adapter) = adapter();
        let snapshot = SessionSnapshot::new(Layout::empty(), vec!["A".into()]);
        adapter.save_snapshot(&snapshot).unwrap();
        let raw: Value = serde_json::from_str(&store.read("panegrid_session").unwrap().unwrap()).unwrap();
        assert!(raw.get("gridLayout").is_some());
        assert!(raw.get("activeModules").is_some());
        assert!(raw.get("savedAt").is_some());
        assert_eq!(adapter.load_snapshot().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (store, adapter) = adapter();
        adapter.save_layout(&Layout::empty()).unwrap();
        adapter.save_modules(&["A".to_string()]).unwrap();
        adapter.save_snapshot(&SessionSnapshot::new(Layout::empty(), vec![])).unwrap();
        assert_eq!(store.len(), 3);
        adapter.clear().unwrap();
        assert!(store.is_empty());
    }
}
