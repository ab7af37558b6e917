//! Normalization and repair of untyped layouts.
//!
//! `normalize_layout` is the lenient path: it never fails and always yields
//! all five breakpoints. `hydrate_layout` repairs storage quirks (string
//! encoded layouts, dictionary-shaped breakpoints) before validation.

use serde_json::{Map, Value};

use crate::{is_valid_layout, Breakpoint, Layout, LayoutError, LayoutItem};

/// Keep only usable items under the five known breakpoints, preserving order.
///
/// A non-object input, or a breakpoint that is not an array, yields empty
/// sequences. Idempotent.
pub fn normalize_layout(layout: &Value) -> Layout {
    let mut out = Layout::empty();
    let Some(obj) = layout.as_object() else {
        return out;
    };

    for bp in Breakpoint::ALL {
        if let Some(Value::Array(items)) = obj.get(bp.as_str()) {
            *out.items_mut(bp) = items.iter().filter_map(LayoutItem::from_value).collect();
        }
    }
    out
}

/// Repair a stored layout value so it can be validated.
///
/// - a JSON string is decoded (a decode failure yields `{}`),
/// - a breakpoint stored as an object becomes an array of its values,
/// - `null` breakpoints become empty arrays,
/// - non-object entries are dropped and unknown top-level keys removed.
///
/// Values that are not objects after decoding, and objects without any
/// breakpoint key, are returned unchanged so the validator still rejects them.
pub fn hydrate_layout(stored: &Value) -> Value {
    let decoded;
    let stored = match stored {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => {
                decoded = v;
                &decoded
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored layout is not valid JSON; using empty layout");
                return Value::Object(Map::new());
            }
        },
        other => other,
    };

    let Some(obj) = stored.as_object() else {
        return stored.clone();
    };
    if !obj.is_empty() && !Breakpoint::ALL.iter().any(|bp| obj.contains_key(bp.as_str())) {
        return stored.clone();
    }

    let mut repaired = Map::new();
    for bp in Breakpoint::ALL {
        let items: Vec<Value> = match obj.get(bp.as_str()) {
            None => continue,
            Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).cloned().collect(),
            Some(Value::Object(dict)) => {
                tracing::debug!(breakpoint = %bp, "Converting dictionary-shaped breakpoint to array");
                dict.values().filter(|v| v.is_object()).cloned().collect()
            }
            Some(Value::Null) => Vec::new(),
            Some(other) => {
                // Scalars stay so the validator rejects the layout.
                repaired.insert(bp.as_str().to_string(), other.clone());
                continue;
            }
        };
        repaired.insert(bp.as_str().to_string(), Value::Array(items));
    }
    Value::Object(repaired)
}

/// Parse a stored layout string leniently: bad JSON degrades to an empty layout.
pub fn parse_layout_str(raw: &str) -> Layout {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => normalize_layout(&hydrate_layout(&value)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stored layout; using empty layout");
            Layout::empty()
        }
    }
}

impl Layout {
    /// Strict conversion: the value must pass [`is_valid_layout`].
    pub fn from_value(value: &Value) -> Result<Layout, LayoutError> {
        if !is_valid_layout(value) {
            return Err(LayoutError::InvalidShape(
                "expected an object of breakpoint arrays with {id, x, y, w, h} items".into(),
            ));
        }
        Ok(normalize_layout(value))
    }

    /// Strict parse from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Layout, LayoutError> {
        let value: Value = serde_json::from_str(raw)?;
        Layout::from_value(&value)
    }
}
