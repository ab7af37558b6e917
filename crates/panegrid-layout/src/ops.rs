//! Item-level edits applied across breakpoints (drag, resize, explicit removal).

use crate::{Breakpoint, Layout, LayoutError, LayoutItem};

impl Layout {
    /// First entry for `id`, searching breakpoints widest first.
    pub fn find_item(&self, id: &str) -> Option<(Breakpoint, &LayoutItem)> {
        self.iter()
            .find_map(|(bp, items)| items.iter().find(|item| item.id == id).map(|item| (bp, item)))
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.find_item(id).is_some()
    }

    /// Remove `id` from every breakpoint. Returns the number of entries removed.
    pub fn remove_item(&mut self, id: &str) -> usize {
        let mut removed = 0;
        for bp in Breakpoint::ALL {
            let items = self.items_mut(bp);
            let before = items.len();
            items.retain(|item| item.id != id);
            removed += before - items.len();
        }
        removed
    }

    /// Merge `patch` into every entry with the same id.
    ///
    /// Position and size are overwritten; extra fields are merged key by key.
    /// Returns the number of entries updated.
    pub fn update_item(&mut self, patch: &LayoutItem) -> usize {
        let mut updated = 0;
        for bp in Breakpoint::ALL {
            for item in self.items_mut(bp).iter_mut().filter(|item| item.id == patch.id) {
                item.x = patch.x;
                item.y = patch.y;
                item.w = patch.w;
                item.h = patch.h;
                for (k, v) in &patch.extra {
                    item.extra.insert(k.clone(), v.clone());
                }
                updated += 1;
            }
        }
        updated
    }

    /// Set the size of `id` in every breakpoint.
    pub fn resize_item(&mut self, id: &str, w: u32, h: u32) -> Result<usize, LayoutError> {
        if w == 0 || h == 0 {
            return Err(LayoutError::InvalidSize { w, h });
        }
        let mut resized = 0;
        for bp in Breakpoint::ALL {
            for item in self.items_mut(bp).iter_mut().filter(|item| item.id == id) {
                item.w = w;
                item.h = h;
                resized += 1;
            }
        }
        if resized == 0 {
            return Err(LayoutError::ItemNotFound(id.to_string()));
        }
        Ok(resized)
    }

    /// Move `id` within a single breakpoint (a drag only affects the active profile).
    pub fn move_item(&mut self, bp: Breakpoint, id: &str, x: u32, y: u32) -> Result<(), LayoutError> {
        let item = self
            .items_mut(bp)
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| LayoutError::ItemNotFound(id.to_string()))?;
        item.x = x;
        item.y = y;
        Ok(())
    }

    /// Order each breakpoint top-to-bottom, then left-to-right. Stable.
    pub fn sort_by_position(&mut self) {
        for bp in Breakpoint::ALL {
            self.items_mut(bp).sort_by_key(|item| (item.y, item.x));
        }
    }
}
