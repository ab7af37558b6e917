//! Layout facade: pane add/remove, tiered save and load.
//!
//! The local tier is written synchronously and its result is what callers
//! get back. The session and remote tiers are mirrored by spawned tasks whose
//! failures are logged and recorded in diagnostics, never returned. There is
//! no debouncing; every save issues its own mirror writes and the last one to
//! land wins.

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::task::JoinHandle;
use uuid::Uuid;

use panegrid_layout::{
    generate_default_layout, hydrate_layout, is_valid_layout, summarize, synchronize_layout_with_report,
    synchronize_with_report, Layout, ModuleInstanceId, SyncReport, SyncResult,
};

use crate::config::SessionConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsLog, LoadSource, NoopDiagnostics};
use crate::persist::{PersistenceAdapter, SessionSnapshot, StorageKeys};
use crate::remote::{LayoutTemplate, RemoteSession, RemoteSessionClient};
use crate::rpc::RpcSessionClient;
use crate::store::{FileStore, KeyValueStore, MemoryStore, StorageTier};
use crate::SessionError;

/// Result of the load fall-back chain, before synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLayout {
    pub layout: Layout,
    /// Module list from the same tier, when that tier had a usable one.
    pub modules: Option<Vec<ModuleInstanceId>>,
    pub source: LoadSource,
}

pub struct LayoutManager {
    local: PersistenceAdapter,
    session: PersistenceAdapter,
    remote: Option<Arc<dyn RemoteSessionClient>>,
    diagnostics: Arc<dyn Diagnostics>,
    autosave: bool,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl LayoutManager {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            local: PersistenceAdapter::new(local, keys.clone()),
            session: PersistenceAdapter::new(session, keys),
            remote: None,
            diagnostics: Arc::new(NoopDiagnostics),
            autosave: true,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// File-backed local tier, in-memory session tier, JSON-RPC remote when
    /// enabled and a bounded [`DiagnosticsLog`].
    pub fn from_config(config: &SessionConfig) -> Self {
        let keys = StorageKeys::from(&config.storage);
        let local: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_dir()));
        let session: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new(StorageTier::Session));
        let mut manager = Self::new(local, session, keys)
            .with_diagnostics(Arc::new(DiagnosticsLog::new(config.diagnostics.capacity)))
            .with_autosave(config.autosave);
        if config.remote.enabled {
            tracing::info!(addr = %config.remote.addr, "Remote session store enabled");
            manager = manager.with_remote(Arc::new(RpcSessionClient::new(config.remote.addr.clone())));
        }
        manager
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteSessionClient>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Configured default for the `autosave` argument of add/remove.
    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    // -----------------------------------------------------------------------
    // Synchronization
    // -----------------------------------------------------------------------

    /// Synchronize untyped input, recording the outcome in diagnostics.
    pub fn synchronize(&self, layout: &Value, active_modules: &Value) -> SyncResult {
        let (result, report) = synchronize_with_report(layout, active_modules);
        self.record_sync(&result, report);
        result
    }

    pub fn add_module(
        &self,
        pane_id: &str,
        layout: &Layout,
        autosave: bool,
        modules: &[ModuleInstanceId],
    ) -> SyncResult {
        let mut ids = modules.to_vec();
        if !ids.iter().any(|id| id == pane_id) {
            ids.push(pane_id.to_string());
        }
        let result = self.sync_and_record(layout, &ids);
        tracing::debug!(pane = pane_id, modules = result.modules.len(), "Module added");
        if autosave {
            self.save_layout(&result.layouts, false, Some(&result.modules));
        }
        result
    }

    /// Drop `pane_id` from the module list and resynchronize.
    ///
    /// The pane's layout entries are left in place, so unless the caller
    /// also strips them (see [`Layout::remove_item`]) the synchronizer adopts
    /// the pane back into the module list.
    pub fn remove_module(
        &self,
        pane_id: &str,
        layout: &Layout,
        autosave: bool,
        modules: &[ModuleInstanceId],
    ) -> SyncResult {
        let ids: Vec<ModuleInstanceId> = modules.iter().filter(|id| *id != pane_id).cloned().collect();
        let result = self.sync_and_record(layout, &ids);
        if result.modules.iter().any(|id| id == pane_id) {
            tracing::debug!(pane = pane_id, "Removed module re-adopted from its layout entry");
        }
        if autosave {
            self.save_layout(&result.layouts, false, Some(&result.modules));
        }
        result
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Validate an untyped layout and save it. Invalid input is rejected
    /// without touching any tier.
    pub fn save_layout_value(
        &self,
        layout: &Value,
        skip_api: bool,
        explicit_modules: Option<&[ModuleInstanceId]>,
    ) -> bool {
        match Layout::from_value(layout) {
            Ok(layout) => self.save_layout(&layout, skip_api, explicit_modules),
            Err(e) => {
                tracing::warn!(error = %e, "Refusing to save invalid layout");
                self.diagnostics.record(DiagnosticKind::Rejected {
                    reason: format!("save_layout: {e}"),
                });
                false
            }
        }
    }

    /// Save a layout and its module list.
    ///
    /// Without `explicit_modules` the module list is every distinct item id
    /// in the layout. Returns whether the local layout write succeeded.
    pub fn save_layout(
        &self,
        layout: &Layout,
        skip_api: bool,
        explicit_modules: Option<&[ModuleInstanceId]>,
    ) -> bool {
        let modules = explicit_modules
            .map(<[ModuleInstanceId]>::to_vec)
            .unwrap_or_else(|| layout.item_ids());

        let local_ok = self.write_local(self.local.save_layout(layout));
        if let Err(e) = self.local.save_modules(&modules) {
            tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to save active modules");
        }

        let session = self.session.clone();
        let (mirror_layout, mirror_modules) = (layout.clone(), modules.clone());
        self.spawn_mirror(StorageTier::Session, async move {
            session.save_layout(&mirror_layout)?;
            session.save_modules(&mirror_modules)?;
            let mut snapshot = session.load_snapshot()?.unwrap_or_default();
            snapshot.grid_layout = mirror_layout;
            snapshot.active_modules = mirror_modules;
            snapshot.saved_at = chrono::Utc::now();
            session.save_snapshot(&snapshot)
        });

        if local_ok && !skip_api {
            if let Some(remote) = self.remote.clone() {
                let layout = layout.clone();
                self.spawn_mirror(StorageTier::Remote, async move {
                    remote.update_grid_layout(&layout).await?;
                    remote.update_active_modules(&modules).await
                });
            }
        }
        local_ok
    }

    /// Save the active module list alone. Returns whether the local write
    /// succeeded.
    pub fn save_active_modules(&self, modules: &[ModuleInstanceId], skip_api: bool) -> bool {
        let local_ok = self.write_local(self.local.save_modules(modules));

        let session = self.session.clone();
        let mirror_modules = modules.to_vec();
        self.spawn_mirror(StorageTier::Session, async move {
            session.save_modules(&mirror_modules)?;
            let mut snapshot = session.load_snapshot()?.unwrap_or_default();
            snapshot.active_modules = mirror_modules;
            snapshot.saved_at = chrono::Utc::now();
            session.save_snapshot(&snapshot)
        });

        if local_ok && !skip_api {
            if let Some(remote) = self.remote.clone() {
                let modules = modules.to_vec();
                self.spawn_mirror(StorageTier::Remote, async move {
                    remote.update_active_modules(&modules).await
                });
            }
        }
        local_ok
    }

    /// Remove layout, module and session records from the local and session
    /// tiers. The remote session is left alone. Returns whether the local
    /// removal succeeded.
    pub fn clear_local(&self) -> bool {
        if let Err(e) = self.session.clear() {
            tracing::warn!(tier = %StorageTier::Session, error = %e, "Failed to clear session storage");
        }
        match self.local.clear() {
            Ok(()) => {
                tracing::info!("Cleared local layout state");
                true
            }
            Err(e) => {
                tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to clear local storage");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Remote session, then local storage, then an empty layout.
    pub async fn load_layout(&self) -> Layout {
        self.load().await.layout
    }

    /// [`LayoutManager::load_layout`] plus the module list from the same
    /// tier (falling back to locally stored modules), synchronized.
    pub async fn load_session(&self) -> SyncResult {
        let loaded = self.load().await;
        let modules = match loaded.modules {
            Some(modules) => modules,
            None => self.local.load_modules().ok().flatten().unwrap_or_default(),
        };
        self.sync_and_record(&loaded.layout, &modules)
    }

    /// The fall-back chain, reporting which tier answered.
    pub async fn load(&self) -> LoadedLayout {
        let loaded = match self.load_remote().await {
            Some(loaded) => loaded,
            None => match self.load_local() {
                Some(loaded) => loaded,
                None => {
                    tracing::info!("No stored layout found, starting empty");
                    LoadedLayout {
                        layout: generate_default_layout(&[]),
                        modules: None,
                        source: LoadSource::Default,
                    }
                }
            },
        };
        self.diagnostics.record(DiagnosticKind::Loaded {
            source: loaded.source,
            items: loaded.layout.count_items(),
        });
        loaded
    }

    /// Last session snapshot cached in the session tier, if it is usable.
    pub fn cached_session(&self) -> Option<SessionSnapshot> {
        match self.session.load_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(tier = %StorageTier::Session, error = %e, "Failed to read cached session");
                None
            }
        }
    }

    async fn load_remote(&self) -> Option<LoadedLayout> {
        let remote = self.remote.as_ref()?;
        let session = match remote.fetch_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch remote session, falling back to local storage");
                return None;
            }
        };
        let layout = remote_layout(&session)?;
        let modules = session.modules();
        tracing::info!(summary = %summarize(&layout), "Loaded layout from remote session");

        self.write_local(self.local.save_layout(&layout));
        if let Some(modules) = &modules {
            if let Err(e) = self.local.save_modules(modules) {
                tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to mirror remote modules");
            }
        }
        let snapshot = SessionSnapshot::new(layout.clone(), modules.clone().unwrap_or_default());
        let cached = self
            .session
            .save_layout(&layout)
            .and_then(|()| match &modules {
                Some(modules) => self.session.save_modules(modules),
                None => Ok(()),
            })
            .and_then(|()| self.session.save_snapshot(&snapshot));
        if let Err(e) = cached {
            tracing::warn!(tier = %StorageTier::Session, error = %e, "Failed to cache remote session");
        }

        Some(LoadedLayout {
            layout,
            modules,
            source: LoadSource::Remote,
        })
    }

    fn load_local(&self) -> Option<LoadedLayout> {
        let layout = match self.local.load_layout() {
            Ok(Some(layout)) => layout,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to read local layout");
                return None;
            }
        };
        let modules = self.local.load_modules().unwrap_or_else(|e| {
            tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to read local modules");
            None
        });
        tracing::info!(summary = %summarize(&layout), "Loaded layout from local storage");

        // Bring the remote session back in line with what we had offline.
        if let Some(remote) = self.remote.clone() {
            let (push_layout, push_modules) = (layout.clone(), modules.clone());
            self.spawn_mirror(StorageTier::Remote, async move {
                remote.update_grid_layout(&push_layout).await?;
                if let Some(modules) = push_modules {
                    remote.update_active_modules(&modules).await?;
                }
                Ok(())
            });
        }

        Some(LoadedLayout {
            layout,
            modules,
            source: LoadSource::Local,
        })
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Store the synchronized form of `layout`/`modules` as a named template.
    pub async fn save_template(
        &self,
        name: &str,
        layout: &Layout,
        modules: &[ModuleInstanceId],
    ) -> Result<LayoutTemplate, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidTemplate("template name must not be empty".into()));
        }
        let remote = self.remote.as_ref().ok_or(SessionError::RemoteDisabled)?;
        let synced = self.sync_and_record(layout, modules);
        let template = remote.save_template(name, &synced.layouts, &synced.modules).await?;
        tracing::info!(template_id = %template.id, name = %template.name, "Saved layout template");
        Ok(template)
    }

    pub async fn list_templates(&self) -> Result<Vec<LayoutTemplate>, SessionError> {
        let remote = self.remote.as_ref().ok_or(SessionError::RemoteDisabled)?;
        remote.list_templates().await
    }

    /// Fetch a template and return its synchronized layout and modules,
    /// saving them when autosave is on.
    pub async fn apply_template(&self, id: Uuid) -> Result<SyncResult, SessionError> {
        let remote = self.remote.as_ref().ok_or(SessionError::RemoteDisabled)?;
        let template = remote.apply_template(id).await?;
        let result = self.sync_and_record(&template.grid, &template.modules);
        tracing::info!(template_id = %id, name = %template.name, "Applied layout template");
        if self.autosave {
            self.save_layout(&result.layouts, false, Some(&result.modules));
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Mirrors
    // -----------------------------------------------------------------------

    /// Wait for every mirror write spawned so far, including ones spawned
    /// while waiting.
    pub async fn flush(&self) {
        loop {
            let handles = self.take_pending();
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "Mirror task did not complete");
                }
            }
        }
    }

    fn take_pending(&self) -> Vec<JoinHandle<()>> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn spawn_mirror<F>(&self, tier: StorageTier, write: F)
    where
        F: Future<Output = Result<(), SessionError>> + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(tier = %tier, "No async runtime, skipping mirror write");
            self.diagnostics.record(DiagnosticKind::Persisted {
                tier,
                ok: false,
                error: Some("no async runtime".into()),
            });
            return;
        };
        let diagnostics = Arc::clone(&self.diagnostics);
        let handle = runtime.spawn(async move {
            match write.await {
                Ok(()) => diagnostics.record(DiagnosticKind::Persisted { tier, ok: true, error: None }),
                Err(e) => {
                    tracing::warn!(tier = %tier, error = %e, "Mirror write failed");
                    diagnostics.record(DiagnosticKind::Persisted {
                        tier,
                        ok: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        });
        if let Ok(mut pending) = self.pending.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    fn write_local(&self, result: Result<(), SessionError>) -> bool {
        let error = result.err().map(|e| {
            tracing::warn!(tier = %StorageTier::Local, error = %e, "Failed to save layout");
            e.to_string()
        });
        let ok = error.is_none();
        self.diagnostics.record(DiagnosticKind::Persisted {
            tier: StorageTier::Local,
            ok,
            error,
        });
        ok
    }

    fn sync_and_record(&self, layout: &Layout, modules: &[ModuleInstanceId]) -> SyncResult {
        let (result, report) = synchronize_layout_with_report(layout, modules);
        self.record_sync(&result, report);
        result
    }

    fn record_sync(&self, result: &SyncResult, report: SyncReport) {
        if report.rejected {
            self.diagnostics.record(DiagnosticKind::Rejected {
                reason: "synchronize: invalid layout or module list".into(),
            });
        }
        self.diagnostics.record(DiagnosticKind::Synchronized {
            summary: summarize(&result.layouts),
            report,
        });
    }
}

/// The remote grid layout, repaired, when it passes validation.
fn remote_layout(session: &RemoteSession) -> Option<Layout> {
    let raw = session.grid_layout.as_ref()?;
    let hydrated = hydrate_layout(raw);
    if !is_valid_layout(&hydrated) {
        tracing::warn!("Remote session layout failed validation, ignoring it");
        return None;
    }
    Layout::from_value(&hydrated).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_remote::MockSessionClient;
    use panegrid_layout::LayoutItem;
    use serde_json::json;

    struct Fixture {
        local: Arc<MemoryStore>,
        session: Arc<MemoryStore>,
        log: Arc<DiagnosticsLog>,
        manager: LayoutManager,
    }

    fn fixture() -> Fixture {
        let local = Arc::new(MemoryStore::new(StorageTier::Local));
        let session = Arc::new(MemoryStore::new(StorageTier::Session));
        let log = Arc::new(DiagnosticsLog::new(64));
        let manager = LayoutManager::new(local.clone(), session.clone(), StorageKeys::default())
            .with_diagnostics(log.clone());
        Fixture {
            local,
            session,
            log,
            manager,
        }
    }

    /// Local tier that reads as empty and refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn tier(&self) -> StorageTier {
            StorageTier::Local
        }

        fn read(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::Storage {
                tier: StorageTier::Local,
                message: "read-only".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), SessionError> {
            Ok(())
        }
    }

    fn one_pane_layout(id: &str) -> Layout {
        let mut layout = Layout::empty();
        layout.lg.push(LayoutItem::new(id, 0, 0, 3, 4));
        layout
    }

    #[test]
    fn test_add_module_appends_once() {
        let fx = fixture();
        let result = fx.manager.add_module("A", &Layout::empty(), false, &[]);
        assert_eq!(result.modules, vec!["A"]);
        let again = fx.manager.add_module("A", &result.layouts, false, &result.modules);
        assert_eq!(again, result);
        assert!(fx.local.is_empty());
    }

    #[test]
    fn test_remove_module_is_readopted() {
        let fx = fixture();
        let layout = one_pane_layout("A");
        let result = fx.manager.remove_module("A", &layout, false, &["A".to_string()]);
        assert_eq!(result.modules, vec!["A"]);

        let mut stripped = layout.clone();
        stripped.remove_item("A");
        let result = fx.manager.remove_module("A", &stripped, false, &["A".to_string()]);
        assert!(result.modules.is_empty());
    }

    #[test]
    fn test_save_without_runtime_keeps_local_result() {
        let fx = fixture();
        assert!(fx.manager.save_layout(&one_pane_layout("A"), false, None));
        assert!(fx.local.read("panegrid_layouts").unwrap().is_some());
        assert_eq!(
            fx.local.read("panegrid_active_modules").unwrap().as_deref(),
            Some(r#"["A"]"#)
        );
        assert!(fx.session.is_empty());
        assert_eq!(fx.log.failures().len(), 1);
    }

    #[test]
    fn test_save_layout_value_rejects_invalid() {
        let fx = fixture();
        assert!(!fx.manager.save_layout_value(&json!({"lg": [{"id": "A"}]}), true, None));
        assert!(fx.local.is_empty());
        assert!(matches!(
            fx.log.last().map(|e| e.kind),
            Some(DiagnosticKind::Rejected { .. })
        ));
    }

    #[test]
    fn test_synchronize_records_rejection() {
        let fx = fixture();
        let result = fx.manager.synchronize(&json!(null), &json!(["A"]));
        assert_eq!(result, SyncResult::empty());
        let kinds: Vec<_> = fx.log.events().into_iter().map(|e| e.kind).collect();
        assert!(matches!(kinds[0], DiagnosticKind::Rejected { .. }));
        assert!(matches!(kinds[1], DiagnosticKind::Synchronized { .. }));
    }

    #[tokio::test]
    async fn test_save_mirrors_to_session_and_remote() {
        let fx = fixture();
        let remote = Arc::new(MockSessionClient::new());
        let manager = fx.manager.with_remote(remote.clone());

        assert!(manager.save_layout(&one_pane_layout("A"), false, Some(&["A".to_string(), "B".to_string()])));
        manager.flush().await;

        assert_eq!(remote.grid_updates(), 1);
        assert_eq!(remote.session().modules(), Some(vec!["A".to_string(), "B".to_string()]));
        let cached = manager.cached_session().unwrap();
        assert_eq!(cached.grid_layout, one_pane_layout("A"));
        assert_eq!(cached.active_modules, vec!["A", "B"]);
        assert!(fx.log.failures().is_empty());
    }

    #[tokio::test]
    async fn test_failed_local_write_skips_remote() {
        let log = Arc::new(DiagnosticsLog::new(64));
        let remote = Arc::new(MockSessionClient::new());
        let session = Arc::new(MemoryStore::new(StorageTier::Session));
        let manager = LayoutManager::new(Arc::new(ReadOnlyStore), session, StorageKeys::default())
            .with_remote(remote.clone())
            .with_diagnostics(log.clone());

        assert!(!manager.save_layout(&one_pane_layout("A"), false, None));
        manager.flush().await;

        assert_eq!(remote.grid_updates(), 0);
        assert_eq!(remote.module_updates(), 0);
        assert!(log.failures().iter().any(|e| matches!(
            e.kind,
            DiagnosticKind::Persisted {
                tier: StorageTier::Local,
                ok: false,
                ..
            }
        )));
    }

    #[tokio::test]
    async fn test_skip_api_skips_remote_only() {
        let fx = fixture();
        let remote = Arc::new(MockSessionClient::new());
        let manager = fx.manager.with_remote(remote.clone());

        assert!(manager.save_active_modules(&["A".to_string()], true));
        manager.flush().await;
        assert_eq!(remote.module_updates(), 0);
        assert_eq!(manager.cached_session().unwrap().active_modules, vec!["A"]);
    }

    #[tokio::test]
    async fn test_remote_failure_is_swallowed() {
        let fx = fixture();
        let remote = Arc::new(MockSessionClient::new());
        remote.set_failing(true);
        let manager = fx.manager.with_remote(remote.clone());

        assert!(manager.save_layout(&one_pane_layout("A"), false, None));
        manager.flush().await;
        let failures = fx.log.failures();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].kind,
            DiagnosticKind::Persisted { tier: StorageTier::Remote, .. }
        ));
    }

    #[tokio::test]
    async fn test_clear_local() {
        let fx = fixture();
        fx.manager.save_layout(&one_pane_layout("A"), true, None);
        fx.manager.flush().await;
        assert!(!fx.session.is_empty());
        assert!(fx.manager.clear_local());
        assert!(fx.local.is_empty());
        assert!(fx.session.is_empty());
        assert_eq!(fx.manager.load_layout().await, Layout::empty());
    }

    #[tokio::test]
    async fn test_templates_require_remote() {
        let fx = fixture();
        assert!(matches!(
            fx.manager.list_templates().await,
            Err(SessionError::RemoteDisabled)
        ));
        assert!(matches!(
            fx.manager.save_template("  ", &Layout::empty(), &[]).await,
            Err(SessionError::InvalidTemplate(_))
        ));
    }
}
