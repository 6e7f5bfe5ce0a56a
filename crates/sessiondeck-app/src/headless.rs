//! A host with no windows, for dry runs from the command line.
//!
//! Every request is logged, and the rectangles each visible surface would
//! get are kept so the caller can print them.

use async_trait::async_trait;
use sessiondeck_common::{HostError, Rect};
use sessiondeck_layout::{GridLayout, LayoutGeometry, SplitState};
use sessiondeck_session::{ProfileDirectory, ProfileSummary, SurfaceHost};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Screen {
    bounds: Rect,
    surfaces: BTreeSet<String>,
    logged_out: BTreeSet<String>,
    placements: Vec<(String, Rect)>,
    content_visible: bool,
}

pub struct HeadlessHost {
    geometry: LayoutGeometry,
    screen: Mutex<Screen>,
}

impl HeadlessHost {
    pub fn new(geometry: LayoutGeometry) -> Self {
        Self {
            geometry,
            screen: Mutex::new(Screen::default()),
        }
    }

    fn screen(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Visible surfaces with their rectangles, as of the last arrangement.
    pub fn placements(&self) -> Vec<(String, Rect)> {
        self.screen().placements.clone()
    }

    pub fn is_logged_out(&self, profile_id: &str) -> bool {
        self.screen().logged_out.contains(profile_id)
    }

    pub fn bounds(&self) -> Rect {
        self.screen().bounds
    }

    pub fn content_visible(&self) -> bool {
        self.screen().content_visible
    }

    fn place(&self, placements: Vec<(String, Rect)>) {
        for (id, rect) in &placements {
            debug!(profile_id = %id, %rect, "surface placed");
        }
        self.screen().placements = placements;
    }
}

#[async_trait]
impl SurfaceHost for HeadlessHost {
    async fn create_or_attach_surface(&self, profile_id: &str) -> Result<(), HostError> {
        let created = self.screen().surfaces.insert(profile_id.to_string());
        info!(profile_id = %profile_id, created, "surface attached");
        Ok(())
    }

    async fn destroy_surface(&self, profile_id: &str) -> Result<(), HostError> {
        let mut screen = self.screen();
        screen.surfaces.remove(profile_id);
        screen.logged_out.remove(profile_id);
        screen.placements.retain(|(id, _)| id != profile_id);
        debug!(profile_id = %profile_id, "surface destroyed");
        Ok(())
    }

    async fn set_surface_visible(&self, profile_id: &str, visible: bool) -> Result<(), HostError> {
        if !self.screen().surfaces.contains(profile_id) {
            return Err(HostError::Rejected {
                command: "set_surface_visible",
                reason: format!("no surface for {profile_id}"),
            });
        }
        debug!(profile_id = %profile_id, visible, "surface visibility");
        Ok(())
    }

    async fn set_content_visible(&self, visible: bool) -> Result<(), HostError> {
        self.screen().content_visible = visible;
        debug!(visible, "content visibility");
        Ok(())
    }

    async fn set_surface_bounds(&self, rect: Rect) -> Result<(), HostError> {
        self.screen().bounds = rect;
        debug!(%rect, "content bounds");
        Ok(())
    }

    async fn set_active_surface(&self, profile_id: &str) -> Result<(), HostError> {
        let bounds = self.bounds();
        self.place(vec![(profile_id.to_string(), bounds)]);
        Ok(())
    }

    async fn set_split_surfaces(
        &self,
        left_id: &str,
        right_id: &str,
        ratio: f64,
    ) -> Result<(), HostError> {
        let Some(split) = SplitState::new(left_id, right_id, ratio) else {
            return Err(HostError::Rejected {
                command: "set_split_surfaces",
                reason: format!("{left_id} cannot be split with itself"),
            });
        };
        let placements = self.geometry.split_layout(self.bounds(), &split);
        self.place(placements);
        Ok(())
    }

    async fn set_grid_surfaces(&self, grid: &GridLayout) -> Result<(), HostError> {
        let placements = self.geometry.grid_layout(self.bounds(), grid);
        self.place(placements);
        Ok(())
    }

    async fn mark_logged_out(&self, profile_id: &str) -> Result<(), HostError> {
        self.screen().logged_out.insert(profile_id.to_string());
        info!(profile_id = %profile_id, "logged out");
        Ok(())
    }

    async fn mark_logged_in(&self, profile_id: &str) -> Result<(), HostError> {
        self.screen().logged_out.remove(profile_id);
        info!(profile_id = %profile_id, "logged in");
        Ok(())
    }
}

/// Profile list given on the command line. Empty means unknown.
pub struct FixedProfiles {
    ids: Vec<String>,
}

impl FixedProfiles {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl ProfileDirectory for FixedProfiles {
    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, HostError> {
        if self.ids.is_empty() {
            return Err(HostError::Unavailable("no profile list given".into()));
        }
        Ok(self
            .ids
            .iter()
            .map(|id| ProfileSummary::new(id.clone(), id.clone()))
            .collect())
    }
}
