//! Session layout engine for SessionDeck.
//!
//! One [`SessionController`] per window owns the open tabs, their
//! split/grid arrangement and the tracked layout. It drives the content
//! process through [`SurfaceHost`] and persists through
//! [`sessiondeck_layout::LayoutStore`].

pub mod arrangement;
pub mod bounds;
pub mod controller;
pub mod debounce;
pub mod host;
pub mod pacing;
pub mod registry;
pub mod settings;
pub mod state;
pub mod tab;

#[cfg(test)]
pub(crate) mod test_support;

pub use arrangement::{Arrangement, Badge, View};
pub use bounds::{content_rect, BoundsSync};
pub use controller::{ApplyReport, Initial, SessionController};
pub use debounce::Debouncer;
pub use host::{ProfileDirectory, ProfileSummary, SurfaceHost};
pub use pacing::Pacing;
pub use registry::TabRegistry;
pub use settings::EngineSettings;
pub use state::{SessionSnapshot, SessionState, TabView};
pub use tab::Tab;
