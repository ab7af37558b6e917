//! panegrid layout core
//!
//! Keeps a per-breakpoint grid layout consistent with the list of active
//! module instances. Everything here is pure and synchronous: validation,
//! normalization, default placement and the layout/module synchronizer.

pub mod breakpoint;
pub mod types;
pub mod error;
pub mod validate;
pub mod normalize;
pub mod defaults;
pub mod sync;
pub mod ops;
pub mod inspect;

pub use breakpoint::*;
pub use types::*;
pub use error::*;
pub use validate::{is_valid_item, is_valid_layout};
pub use normalize::{hydrate_layout, normalize_layout, parse_layout_str};
pub use defaults::{generate_default_layout, DEFAULT_ITEM_HEIGHT};
pub use sync::{
    synchronize, synchronize_layout, synchronize_layout_with_report, synchronize_with_report,
    SyncReport,
};
pub use inspect::{inspect_layout, summarize, LayoutReport};
