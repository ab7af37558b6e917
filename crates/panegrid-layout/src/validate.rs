//! Shape checks for untyped (persisted or client-supplied) layouts.

use serde_json::Value;

use crate::{Breakpoint, LayoutItem};

/// Whether a single untyped item is a usable layout entry.
pub fn is_valid_item(item: &Value) -> bool {
    LayoutItem::from_value(item).is_some()
}

/// Whether `layout` is a structurally valid breakpoint-keyed layout.
///
/// - `layout` must be a JSON object.
/// - Each known breakpoint is optional (absent or `null`); otherwise it must be an array.
/// - Every element of such an array must be a valid item.
///
/// Unknown top-level keys are ignored, but a non-empty object carrying none
/// of the breakpoint keys is a foreign record, not a layout.
pub fn is_valid_layout(layout: &Value) -> bool {
    let Some(obj) = layout.as_object() else {
        return false;
    };
    if !obj.is_empty() && !Breakpoint::ALL.iter().any(|bp| obj.contains_key(bp.as_str())) {
        return false;
    }

    Breakpoint::ALL.iter().all(|bp| match obj.get(bp.as_str()) {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.iter().all(is_valid_item),
        Some(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_rejected() {
        assert!(!is_valid_layout(&Value::Null));
        assert!(!is_valid_layout(&json!([])));
        assert!(!is_valid_layout(&json!("lg")));
    }

    #[test]
    fn test_empty_object_is_valid() {
        assert!(is_valid_layout(&json!({})));
    }

    #[test]
    fn test_missing_height_rejected() {
        let layout = json!({"lg": [{"id": "a", "x": 0, "y": 0, "w": 1}]});
        assert!(!is_valid_layout(&layout));
    }

    #[test]
    fn test_non_array_breakpoint_rejected() {
        assert!(!is_valid_layout(&json!({"md": {"0": {"id": "a", "x": 0, "y": 0, "w": 1, "h": 1}}})));
        assert!(!is_valid_layout(&json!({"sm": 3})));
    }

    #[test]
    fn test_null_breakpoint_counts_as_absent() {
        assert!(is_valid_layout(&json!({"sm": null, "lg": []})));
    }

    #[test]
    fn test_non_string_id_rejected() {
        assert!(!is_valid_layout(&json!({"lg": [{"id": 7, "x": 0, "y": 0, "w": 1, "h": 1}]})));
    }

    #[test]
    fn test_foreign_object_rejected() {
        assert!(!is_valid_layout(&json!({"not": "a layout"})));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let layout = json!({
            "lg": [{"id": "a", "x": 0, "y": 0, "w": 3, "h": 4}],
            "xl": "whatever"
        });
        assert!(is_valid_layout(&layout));
    }
}
