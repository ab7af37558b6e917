use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Breakpoint;

/// Identifier of a pane instance: `<ModuleType>-<StaticIdentifier>[-<InstanceSuffix>]`.
///
/// Treated as an opaque key by the layout core.
pub type ModuleInstanceId = String;

/// Item keys every layout entry must carry besides its id.
pub const POSITION_KEYS: [&str; 4] = ["x", "y", "w", "h"];

/// Legacy id key written by the grid library.
pub const LEGACY_ID_KEY: &str = "i";

/// One pane's placement inside a single breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    #[serde(alias = "i")]
    pub id: ModuleInstanceId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// UI-only fields (`isResizable`, `minW`, `moduleType`, ...) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayoutItem {
    pub fn new(id: impl Into<ModuleInstanceId>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            extra: Map::new(),
        }
    }

    /// Build an item from an untyped JSON value.
    ///
    /// Returns `None` unless the value is an object with a string id
    /// (`id`, or the legacy `i`) and non-negative integer `x`, `y`, `w`, `h`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = item_id(obj)?;
        let x = grid_unit(obj.get("x")?)?;
        let y = grid_unit(obj.get("y")?)?;
        let w = grid_unit(obj.get("w")?)?;
        let h = grid_unit(obj.get("h")?)?;

        let extra = obj
            .iter()
            .filter(|(k, _)| {
                let k = k.as_str();
                k != "id" && k != LEGACY_ID_KEY && !POSITION_KEYS.contains(&k)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Some(Self {
            id: id.to_string(),
            x,
            y,
            w,
            h,
            extra,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::String(self.id.clone()));
        obj.insert("x".into(), Value::from(self.x));
        obj.insert("y".into(), Value::from(self.y));
        obj.insert("w".into(), Value::from(self.w));
        obj.insert("h".into(), Value::from(self.h));
        for (k, v) in &self.extra {
            obj.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Value::Object(obj)
    }
}

/// Id of an untyped item: `id` first, then the legacy `i`.
pub(crate) fn item_id(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("id")
        .and_then(Value::as_str)
        .or_else(|| obj.get(LEGACY_ID_KEY).and_then(Value::as_str))
}

/// Grid coordinates are non-negative integers. `3.0` is accepted, `3.5` is not.
pub(crate) fn grid_unit(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Breakpoint-keyed placement map. Always has all five breakpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub lg: Vec<LayoutItem>,
    #[serde(default)]
    pub md: Vec<LayoutItem>,
    #[serde(default)]
    pub sm: Vec<LayoutItem>,
    #[serde(default)]
    pub xs: Vec<LayoutItem>,
    #[serde(default)]
    pub xxs: Vec<LayoutItem>,
}

impl Layout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self, bp: Breakpoint) -> &[LayoutItem] {
        match bp {
            Breakpoint::Lg => &self.lg,
            Breakpoint::Md => &self.md,
            Breakpoint::Sm => &self.sm,
            Breakpoint::Xs => &self.xs,
            Breakpoint::Xxs => &self.xxs,
        }
    }

    pub fn items_mut(&mut self, bp: Breakpoint) -> &mut Vec<LayoutItem> {
        match bp {
            Breakpoint::Lg => &mut self.lg,
            Breakpoint::Md => &mut self.md,
            Breakpoint::Sm => &mut self.sm,
            Breakpoint::Xs => &mut self.xs,
            Breakpoint::Xxs => &mut self.xxs,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Breakpoint, &[LayoutItem])> + '_ {
        Breakpoint::ALL.into_iter().map(move |bp| (bp, self.items(bp)))
    }

    /// Distinct item ids, in first-seen order walking `lg` through `xxs`.
    pub fn item_ids(&self) -> Vec<ModuleInstanceId> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for (_, items) in self.iter() {
            for item in items {
                if seen.insert(item.id.as_str()) {
                    ids.push(item.id.clone());
                }
            }
        }
        ids
    }

    pub fn count_items(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count_items() == 0
    }

    pub fn to_value(&self) -> Value {
        let obj = self
            .iter()
            .map(|(bp, items)| {
                let items = items.iter().map(LayoutItem::to_value).collect();
                (bp.as_str().to_string(), Value::Array(items))
            })
            .collect();
        Value::Object(obj)
    }
}

/// Parsed form of a [`ModuleInstanceId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdParts {
    pub module_type: String,
    pub static_id: String,
    pub instance: Option<String>,
}

impl ModuleIdParts {
    /// Split `<Type>-<Static>[-<Suffix>]`. The suffix keeps any further dashes.
    pub fn parse(id: &str) -> Option<Self> {
        let mut parts = id.splitn(3, '-');
        let module_type = parts.next().filter(|s| !s.is_empty())?;
        let static_id = parts.next().filter(|s| !s.is_empty())?;
        let instance = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        Some(Self {
            module_type: module_type.to_string(),
            static_id: static_id.to_string(),
            instance,
        })
    }
}

/// A mutually consistent layout / active-module pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncResult {
    pub layouts: Layout,
    pub modules: Vec<ModuleInstanceId>,
}

impl SyncResult {
    /// The fail-safe state: no panes.
    pub fn empty() -> Self {
        Self::default()
    }
}
