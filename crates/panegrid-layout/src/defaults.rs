//! Deterministic seed placement for panes that have no layout entry yet.

use crate::{Breakpoint, Layout, LayoutItem, ModuleInstanceId};

/// Height (in rows) of every seeded item.
pub const DEFAULT_ITEM_HEIGHT: u32 = 4;

/// Seed a layout for `module_ids`.
///
/// Item `i` in each breakpoint gets `x = (i * width) % columns`, `y = 0`,
/// the breakpoint's default width and [`DEFAULT_ITEM_HEIGHT`]. Items wrap
/// horizontally inside one row band; collision handling is left to the grid
/// renderer.
pub fn generate_default_layout(module_ids: &[ModuleInstanceId]) -> Layout {
    let mut layout = Layout::empty();
    for bp in Breakpoint::ALL {
        *layout.items_mut(bp) = seed_items(bp, module_ids);
    }
    layout
}

/// Seed items for a single breakpoint.
pub(crate) fn seed_items(bp: Breakpoint, module_ids: &[ModuleInstanceId]) -> Vec<LayoutItem> {
    let w = bp.default_width();
    let cols = bp.columns() as u64;
    module_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let x = ((i as u64 * w as u64) % cols) as u32;
            LayoutItem::new(id.clone(), x, 0, w, DEFAULT_ITEM_HEIGHT)
        })
        .collect()
}
