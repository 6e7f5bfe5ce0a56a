//! Layout model and persistence for SessionDeck.
//!
//! A [`TabLayout`] is the persisted unit: an ordered tab list plus the split
//! pair, grid arrangements, active selection and logged-out set that were
//! live when it was saved. Documents are normalized on every read so a
//! hand-edited or older file still applies cleanly.

pub mod geometry;
pub mod model;
pub mod shape;
pub mod store;

pub use geometry::LayoutGeometry;
pub use model::{
    clamp_ratio, default_layout_name, GridCell, GridLayout, LayoutView, NamedGrid, RestorePlan,
    RestoreView, SplitState, TabLayout, TabLayoutInput, DEFAULT_SPLIT_RATIO, MAX_SPLIT_RATIO,
    MIN_SPLIT_RATIO,
};
pub use shape::{GridShape, ShapeDescriptor};
pub use store::{default_layouts_path, JsonLayoutStore, LayoutBook, LayoutStore, MemoryLayoutStore};
