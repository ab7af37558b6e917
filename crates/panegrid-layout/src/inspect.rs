//! Layout inspection for diagnostics panels and logs.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{is_valid_item, Breakpoint, Layout};

/// Everything wrong (or notable) about an untyped layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    /// The input was not a JSON object at all.
    pub not_an_object: bool,
    pub missing_breakpoints: Vec<Breakpoint>,
    pub non_array_breakpoints: Vec<Breakpoint>,
    /// Indices of unusable items, per breakpoint.
    pub invalid_items: BTreeMap<Breakpoint, Vec<usize>>,
    pub unknown_keys: Vec<String>,
    pub item_counts: BTreeMap<Breakpoint, usize>,
}

impl LayoutReport {
    /// No structural problems. Missing breakpoints and unknown keys are tolerated.
    pub fn is_clean(&self) -> bool {
        !self.not_an_object && self.non_array_breakpoints.is_empty() && self.invalid_items.is_empty()
    }
}

pub fn inspect_layout(layout: &Value) -> LayoutReport {
    let mut report = LayoutReport::default();
    let Some(obj) = layout.as_object() else {
        report.not_an_object = true;
        return report;
    };

    for bp in Breakpoint::ALL {
        match obj.get(bp.as_str()) {
            None | Some(Value::Null) => report.missing_breakpoints.push(bp),
            Some(Value::Array(items)) => {
                report.item_counts.insert(bp, items.len());
                let invalid: Vec<usize> = items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| !is_valid_item(item))
                    .map(|(idx, _)| idx)
                    .collect();
                if !invalid.is_empty() {
                    report.invalid_items.insert(bp, invalid);
                }
            }
            Some(_) => report.non_array_breakpoints.push(bp),
        }
    }

    report.unknown_keys = obj
        .keys()
        .filter(|k| k.parse::<Breakpoint>().is_err())
        .cloned()
        .collect();

    if !report.is_clean() {
        tracing::debug!(
            non_array = ?report.non_array_breakpoints,
            invalid = ?report.invalid_items,
            "Layout inspection found problems"
        );
    }
    report
}

/// One-line summary, e.g. `lg=2 md=2 sm=2 xs=2 xxs=2 ids=[A,B]`.
pub fn summarize(layout: &Layout) -> String {
    let counts: Vec<String> = layout
        .iter()
        .map(|(bp, items)| format!("{bp}={}", items.len()))
        .collect();
    format!("{} ids=[{}]", counts.join(" "), layout.item_ids().join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayoutItem;
    use serde_json::json;

    #[test]
    fn test_inspect_reports_everything() {
        let report = inspect_layout(&json!({
            "lg": [{"id": "A", "x": 0, "y": 0, "w": 3, "h": 4}, {"id": "B"}],
            "md": {"0": {}},
            "xl": []
        }));
        assert!(!report.is_clean());
        assert_eq!(report.non_array_breakpoints, vec![Breakpoint::Md]);
        assert_eq!(report.invalid_items.get(&Breakpoint::Lg), Some(&vec![1]));
        assert_eq!(report.missing_breakpoints, vec![Breakpoint::Sm, Breakpoint::Xs, Breakpoint::Xxs]);
        assert_eq!(report.unknown_keys, vec!["xl"]);
        assert_eq!(report.item_counts.get(&Breakpoint::Lg), Some(&2));
    }

    #[test]
    fn test_inspect_non_object() {
        let report = inspect_layout(&json!(null));
        assert!(report.not_an_object);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_summarize() {
        let mut layout = Layout::empty();
        layout.lg.push(LayoutItem::new("A", 0, 0, 3, 4));
        layout.xs.push(LayoutItem::new("B", 0, 0, 12, 4));
        assert_eq!(summarize(&layout), "lg=1 md=0 sm=0 xs=1 xxs=0 ids=[A,B]");
    }
}
