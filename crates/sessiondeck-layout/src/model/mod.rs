//! In-memory and persisted layout types.

mod document;
mod grid;
mod split;


pub(crate) use document::timestamp;
pub use document::{
    default_layout_name, LayoutView, NamedGrid, RestorePlan, RestoreView, TabLayout, TabLayoutInput,
};
pub use grid::{GridCell, GridLayout};
pub use split::{clamp_ratio, SplitState, DEFAULT_SPLIT_RATIO, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
