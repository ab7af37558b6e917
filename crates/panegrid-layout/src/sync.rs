//! Layout / active-module synchronization.
//!
//! The layout's item ids are the ground truth for which panes exist; the
//! active-module list is an ordering hint kept consistent with it:
//!
//! 1. Ids listed in `active_modules` that have a layout entry keep their
//!    `active_modules` order (first occurrence wins).
//! 2. Ids present only in the layout are adopted, appended in layout order.
//! 3. Ids present only in `active_modules` are seeded with a default entry and
//!    appended after the adopted ones.
//! 4. Every breakpoint then receives a default entry for each module it lacks.
//!
//! Malformed input (invalid layout, non-array module list) never errors; it
//! yields the empty state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::seed_items;
use crate::{is_valid_layout, normalize_layout, Breakpoint, Layout, ModuleInstanceId, SyncResult};

/// What a synchronization pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Layout-only ids folded into the module list.
    pub adopted: Vec<ModuleInstanceId>,
    /// Module-only ids that received fresh entries in every breakpoint.
    pub seeded: Vec<ModuleInstanceId>,
    /// Entries generated for known modules missing from some breakpoints.
    pub filled: usize,
    /// Repeated ids dropped from the module list.
    pub duplicates_dropped: usize,
    /// Non-string entries dropped from an untyped module list.
    pub non_string_dropped: usize,
    /// Input was malformed and the empty state was returned.
    pub rejected: bool,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.adopted.is_empty()
            && self.seeded.is_empty()
            && self.filled == 0
            && self.duplicates_dropped == 0
            && self.non_string_dropped == 0
            && !self.rejected
    }
}

/// Synchronize an untyped layout against an untyped module list.
pub fn synchronize(layout: &Value, active_modules: &Value) -> SyncResult {
    synchronize_with_report(layout, active_modules).0
}

/// [`synchronize`], also returning what changed.
pub fn synchronize_with_report(layout: &Value, active_modules: &Value) -> (SyncResult, SyncReport) {
    if !is_valid_layout(layout) {
        tracing::warn!("Invalid layout passed to synchronize; falling back to empty state");
        return rejected();
    }
    let Some(entries) = active_modules.as_array() else {
        tracing::warn!("Active module list is not an array; falling back to empty state");
        return rejected();
    };

    let mut ids = Vec::with_capacity(entries.len());
    let mut non_string = 0;
    for entry in entries {
        match entry.as_str() {
            Some(id) => ids.push(id.to_string()),
            None => non_string += 1,
        }
    }
    if non_string > 0 {
        tracing::warn!(count = non_string, "Dropping non-string active module entries");
    }

    let (result, mut report) = reconcile(normalize_layout(layout), &ids);
    report.non_string_dropped = non_string;
    (result, report)
}

/// Synchronize a typed layout against a typed module list.
pub fn synchronize_layout(layout: &Layout, active_modules: &[ModuleInstanceId]) -> SyncResult {
    reconcile(layout.clone(), active_modules).0
}

/// [`synchronize_layout`], also returning what changed.
pub fn synchronize_layout_with_report(
    layout: &Layout,
    active_modules: &[ModuleInstanceId],
) -> (SyncResult, SyncReport) {
    reconcile(layout.clone(), active_modules)
}

fn rejected() -> (SyncResult, SyncReport) {
    let report = SyncReport {
        rejected: true,
        ..Default::default()
    };
    (SyncResult::empty(), report)
}

fn reconcile(mut layouts: Layout, active_modules: &[ModuleInstanceId]) -> (SyncResult, SyncReport) {
    let mut report = SyncReport::default();

    let layout_ids = layouts.item_ids();
    let mut unclaimed: HashSet<&str> = layout_ids.iter().map(String::as_str).collect();

    let mut modules = Vec::with_capacity(active_modules.len() + layout_ids.len());
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for id in active_modules {
        if !seen.insert(id.as_str()) {
            report.duplicates_dropped += 1;
            continue;
        }
        if unclaimed.remove(id.as_str()) {
            modules.push(id.clone());
        } else {
            missing.push(id.clone());
        }
    }

    for id in &layout_ids {
        if unclaimed.contains(id.as_str()) {
            report.adopted.push(id.clone());
        }
    }
    modules.extend(report.adopted.iter().cloned());
    modules.extend(missing.iter().cloned());
    report.seeded = missing;

    for bp in Breakpoint::ALL {
        let absent = absent_in(&layouts, bp, &modules);
        if absent.is_empty() {
            continue;
        }
        report.filled += absent
            .iter()
            .filter(|id| !report.seeded.contains(id))
            .count();
        let seeded = seed_items(bp, &absent);
        layouts.items_mut(bp).extend(seeded);
    }

    if !report.is_noop() {
        tracing::debug!(
            modules = modules.len(),
            adopted = report.adopted.len(),
            seeded = report.seeded.len(),
            filled = report.filled,
            duplicates = report.duplicates_dropped,
            "Synchronized layout with active modules"
        );
    }

    (SyncResult { layouts, modules }, report)
}

/// Modules without an entry in `bp`, in module order.
fn absent_in(layouts: &Layout, bp: Breakpoint, modules: &[ModuleInstanceId]) -> Vec<ModuleInstanceId> {
    let present: HashSet<&str> = layouts.items(bp).iter().map(|i| i.id.as_str()).collect();
    modules
        .iter()
        .filter(|id| !present.contains(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutItem;
    use serde_json::json;

    #[test]
    fn test_matched_modules_keep_active_order() {
        let mut layout = Layout::empty();
        for bp in Breakpoint::ALL {
            layout.items_mut(bp).push(LayoutItem::new("A", 0, 0, 3, 4));
            layout.items_mut(bp).push(LayoutItem::new("B", 3, 0, 3, 4));
        }
        let result = synchronize_layout(&layout, &["B".to_string(), "A".to_string()]);
        assert_eq!(result.modules, vec!["B", "A"]);
        assert_eq!(result.layouts, layout);
    }

    #[test]
    fn test_adopted_before_seeded() {
        let layout = json!({"lg": [{"id": "L", "x": 0, "y": 0, "w": 3, "h": 4}]});
        let (result, report) = synchronize_with_report(&layout, &json!(["N"]));
        assert_eq!(result.modules, vec!["L", "N"]);
        assert_eq!(report.adopted, vec!["L"]);
        assert_eq!(report.seeded, vec!["N"]);
        // L is filled into md..xxs, N seeded everywhere.
        assert_eq!(report.filled, 4);
        assert_eq!(result.layouts.lg[1].id, "N");
        // Seeds are placed from column 0 regardless of existing items;
        // overlap is resolved by the grid renderer.
        assert_eq!(result.layouts.lg[1].x, 0);
        assert_eq!(result.layouts.md[0].id, "L");
        assert_eq!(result.layouts.md[1].id, "N");
    }

    #[test]
    fn test_non_string_modules_dropped() {
        let (result, report) = synchronize_with_report(&json!({}), &json!(["A", 3, null]));
        assert_eq!(result.modules, vec!["A"]);
        assert_eq!(report.non_string_dropped, 2);
    }

    #[test]
    fn test_rejected_input_reports() {
        let (result, report) = synchronize_with_report(&json!({"lg": 1}), &json!([]));
        assert_eq!(result, SyncResult::empty());
        assert!(report.rejected);
        let (_, report) = synchronize_with_report(&json!({}), &json!("A"));
        assert!(report.rejected);
    }

    #[test]
    fn test_extra_fields_survive_sync() {
        let layout = json!({"lg": [{"id": "A", "x": 0, "y": 0, "w": 3, "h": 4, "isResizable": false}]});
        let result = synchronize(&layout, &json!(["A"]));
        assert_eq!(result.layouts.lg[0].extra.get("isResizable"), Some(&json!(false)));
    }
}
