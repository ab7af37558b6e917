//! In-memory remote session store for offline use and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use panegrid_layout::{Layout, ModuleInstanceId};

use crate::remote::{LayoutTemplate, RemoteFuture, RemoteSession, RemoteSessionClient};
use crate::SessionError;

#[derive(Default)]
struct MockState {
    session: RemoteSession,
    templates: Vec<LayoutTemplate>,
}

/// Remote client backed by a mutex-guarded session.
///
/// `set_failing(true)` makes every call fail with [`SessionError::Remote`],
/// which is how tests exercise the fall-back paths.
#[derive(Default)]
pub struct MockSessionClient {
    state: Mutex<MockState>,
    failing: AtomicBool,
    grid_updates: AtomicUsize,
    module_updates: AtomicUsize,
}

impl MockSessionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given raw session.
    pub fn with_session(grid_layout: Option<Value>, active_modules: Option<Value>) -> Self {
        let client = Self::new();
        client.set_session(RemoteSession {
            grid_layout,
            active_modules,
        });
        client
    }

    pub fn set_session(&self, session: RemoteSession) {
        if let Ok(mut state) = self.state.lock() {
            state.session = session;
        }
    }

    pub fn session(&self) -> RemoteSession {
        self.state
            .lock()
            .map(|s| s.session.clone())
            .unwrap_or_default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn grid_updates(&self) -> usize {
        self.grid_updates.load(Ordering::SeqCst)
    }

    pub fn module_updates(&self) -> usize {
        self.module_updates.load(Ordering::SeqCst)
    }

    fn check(&self, method: &str) -> Result<(), SessionError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SessionError::Remote(format!("mock remote unavailable ({method})")));
        }
        Ok(())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> Result<T, SessionError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SessionError::Remote("mock state poisoned".into()))?;
        Ok(f(&mut state))
    }
}

impl RemoteSessionClient for MockSessionClient {
    fn fetch_session(&self) -> RemoteFuture<'_, RemoteSession> {
        Box::pin(async move {
            self.check("session.get")?;
            self.with_state(|s| s.session.clone())
        })
    }

    fn update_grid_layout<'a>(&'a self, layout: &'a Layout) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.check("session.update_grid")?;
            let value = serde_json::to_value(layout)?;
            self.with_state(|s| s.session.grid_layout = Some(value))?;
            self.grid_updates.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("Mock remote grid layout replaced");
            Ok(())
        })
    }

    fn update_active_modules<'a>(&'a self, modules: &'a [ModuleInstanceId]) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.check("session.update_modules")?;
            let value = serde_json::to_value(modules)?;
            self.with_state(|s| s.session.active_modules = Some(value))?;
            self.module_updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn save_template<'a>(
        &'a self,
        name: &'a str,
        grid: &'a Layout,
        modules: &'a [ModuleInstanceId],
    ) -> RemoteFuture<'a, LayoutTemplate> {
        Box::pin(async move {
            self.check("layouts.save_template")?;
            let template = LayoutTemplate {
                id: Uuid::new_v4(),
                name: name.to_string(),
                grid: grid.clone(),
                modules: modules.to_vec(),
                created_at: Utc::now(),
            };
            self.with_state(|s| s.templates.push(template.clone()))?;
            tracing::info!(template_id = %template.id, name = %template.name, "Mock template saved");
            Ok(template)
        })
    }

    fn list_templates(&self) -> RemoteFuture<'_, Vec<LayoutTemplate>> {
        Box::pin(async move {
            self.check("layouts.list_templates")?;
            self.with_state(|s| s.templates.clone())
        })
    }

    fn apply_template(&self, id: Uuid) -> RemoteFuture<'_, LayoutTemplate> {
        Box::pin(async move {
            self.check("layouts.apply_template")?;
            self.with_state(|s| s.templates.iter().find(|t| t.id == id).cloned())?
                .ok_or_else(|| SessionError::TemplateNotFound(id.to_string()))
        })
    }
}
