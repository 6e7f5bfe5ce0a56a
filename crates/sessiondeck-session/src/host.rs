//! Boundaries to the process that owns the content surfaces and to the
//! profile directory.
//!
//! The engine never renders anything itself. It asks the host to create,
//! arrange and show one surface per profile, and awaits each request before
//! relying on its effect.

use async_trait::async_trait;
use sessiondeck_common::{HostError, Rect};
use sessiondeck_layout::GridLayout;

#[async_trait]
pub trait SurfaceHost: Send + Sync {
    /// Create the surface for a profile, or reattach an existing one.
    async fn create_or_attach_surface(&self, profile_id: &str) -> Result<(), HostError>;

    async fn destroy_surface(&self, profile_id: &str) -> Result<(), HostError>;

    async fn set_surface_visible(&self, profile_id: &str, visible: bool) -> Result<(), HostError>;

    /// Hide or show the whole content area, used around resets and modals.
    async fn set_content_visible(&self, visible: bool) -> Result<(), HostError>;

    /// The rectangle available to content, below the tab strip.
    async fn set_surface_bounds(&self, rect: Rect) -> Result<(), HostError>;

    /// Show `profile_id` alone, in front, with input focus.
    async fn set_active_surface(&self, profile_id: &str) -> Result<(), HostError>;

    /// Show two surfaces side by side. `ratio` is the left share.
    async fn set_split_surfaces(
        &self,
        left_id: &str,
        right_id: &str,
        ratio: f64,
    ) -> Result<(), HostError>;

    /// Show every cell of `grid`. The active position holds focus.
    async fn set_grid_surfaces(&self, grid: &GridLayout) -> Result<(), HostError>;

    /// Replace the profile's content with its login placeholder.
    async fn mark_logged_out(&self, profile_id: &str) -> Result<(), HostError>;

    async fn mark_logged_in(&self, profile_id: &str) -> Result<(), HostError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub job: Option<String>,
}

impl ProfileSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            job: None,
        }
    }
}

/// Source of the profiles a user has configured.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, HostError>;
}
