//! Remote session store abstraction.
//!
//! The backend keeps one session per user (grid layout plus active module
//! list) and a set of named layout templates. Session updates are full
//! replacements; there is no version token, so the last write wins.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use panegrid_layout::{Layout, ModuleInstanceId};

use crate::SessionError;

/// Boxed future returned by [`RemoteSessionClient`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SessionError>> + Send + 'a>>;

/// Session as returned by the backend. Either part may be missing or
/// malformed; callers validate before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSession {
    #[serde(default, alias = "gridLayout")]
    pub grid_layout: Option<Value>,
    #[serde(default, alias = "activeModules")]
    pub active_modules: Option<Value>,
}

impl RemoteSession {
    /// The module list, if it is an array. Non-string entries are dropped.
    pub fn modules(&self) -> Option<Vec<ModuleInstanceId>> {
        let entries = self.active_modules.as_ref()?.as_array()?;
        Some(
            entries
                .iter()
                .filter_map(|e| e.as_str().map(str::to_string))
                .collect(),
        )
    }
}

/// A named layout snapshot stored on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub id: Uuid,
    pub name: String,
    pub grid: Layout,
    pub modules: Vec<ModuleInstanceId>,
    pub created_at: DateTime<Utc>,
}

/// Client for the backend session store.
///
/// Implementations must be cheap to share: the layout manager holds one
/// behind an `Arc` and calls it from spawned tasks.
pub trait RemoteSessionClient: Send + Sync {
    fn fetch_session(&self) -> RemoteFuture<'_, RemoteSession>;

    /// Replace the stored grid layout.
    fn update_grid_layout<'a>(&'a self, layout: &'a Layout) -> RemoteFuture<'a, ()>;

    /// Replace the stored active module list.
    fn update_active_modules<'a>(&'a self, modules: &'a [ModuleInstanceId]) -> RemoteFuture<'a, ()>;

    fn save_template<'a>(
        &'a self,
        name: &'a str,
        grid: &'a Layout,
        modules: &'a [ModuleInstanceId],
    ) -> RemoteFuture<'a, LayoutTemplate>;

    fn list_templates(&self) -> RemoteFuture<'_, Vec<LayoutTemplate>>;

    fn apply_template(&self, id: Uuid) -> RemoteFuture<'_, LayoutTemplate>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_session_accepts_both_casings() {
        let snake: RemoteSession =
            serde_json::from_value(json!({"grid_layout": {"lg": []}, "active_modules": ["A"]})).unwrap();
        let camel: RemoteSession =
            serde_json::from_value(json!({"gridLayout": {"lg": []}, "activeModules": ["A"]})).unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.modules(), Some(vec!["A".to_string()]));
    }

    #[test]
    fn test_remote_session_missing_parts() {
        let session: RemoteSession = serde_json::from_value(json!({})).unwrap();
        assert_eq!(session.grid_layout, None);
        assert_eq!(session.modules(), None);

        let session: RemoteSession =
            serde_json::from_value(json!({"active_modules": ["A", 1, "B"]})).unwrap();
        assert_eq!(session.modules(), Some(vec!["A".to_string(), "B".to_string()]));

        let session: RemoteSession = serde_json::from_value(json!({"active_modules": "A"})).unwrap();
        assert_eq!(session.modules(), None);
    }
}
