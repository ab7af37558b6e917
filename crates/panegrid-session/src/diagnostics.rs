//! Introspection hooks injected into the [`LayoutManager`](crate::LayoutManager).

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use panegrid_layout::SyncReport;

use crate::store::StorageTier;

/// Where a loaded layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Remote,
    Local,
    Default,
}

impl std::fmt::Display for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Default => "default",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    Synchronized { report: SyncReport, summary: String },
    Persisted { tier: StorageTier, ok: bool, error: Option<String> },
    Loaded { source: LoadSource, items: usize },
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

pub trait Diagnostics: Send + Sync {
    fn record(&self, kind: DiagnosticKind);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn record(&self, _kind: DiagnosticKind) {}
}

/// Keeps the most recent `capacity` events.
pub struct DiagnosticsLog {
    capacity: usize,
    events: Mutex<VecDeque<DiagnosticEvent>>,
}

impl DiagnosticsLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Snapshot, oldest first.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<DiagnosticEvent> {
        self.events.lock().ok().and_then(|events| events.back().cloned())
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Persistence failures recorded so far.
    pub fn failures(&self) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e.kind, DiagnosticKind::Persisted { ok: false, .. }))
            .collect()
    }
}

impl Diagnostics for DiagnosticsLog {
    fn record(&self, kind: DiagnosticKind) {
        let Ok(mut events) = self.events.lock() else {
            return;
        };
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(DiagnosticEvent { at: Utc::now(), kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(reason: &str) -> DiagnosticKind {
        DiagnosticKind::Rejected { reason: reason.into() }
    }

    #[test]
    fn test_log_is_bounded() {
        let log = DiagnosticsLog::new(2);
        log.record(rejected("a"));
        log.record(rejected("b"));
        log.record(rejected("c"));
        let reasons: Vec<_> = log
            .events()
            .into_iter()
            .map(|e| match e.kind {
                DiagnosticKind::Rejected { reason } => reason,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(reasons, vec!["b", "c"]);
    }

    #[test]
    fn test_failures_filter() {
        let log = DiagnosticsLog::new(8);
        log.record(DiagnosticKind::Persisted { tier: StorageTier::Local, ok: true, error: None });
        log.record(DiagnosticKind::Persisted {
            tier: StorageTier::Remote,
            ok: false,
            error: Some("refused".into()),
        });
        assert_eq!(log.len(), 2);
        let failures = log.failures();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].kind, DiagnosticKind::Persisted { tier: StorageTier::Remote, .. }));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_serializes_flat() {
        let log = DiagnosticsLog::new(1);
        log.record(DiagnosticKind::Loaded { source: LoadSource::Local, items: 3 });
        let json = serde_json::to_value(log.last().unwrap()).unwrap();
        assert_eq!(json["kind"], "loaded");
        assert_eq!(json["source"], "local");
        assert_eq!(json["items"], 3);
        assert!(json.get("at").is_some());
    }
}
