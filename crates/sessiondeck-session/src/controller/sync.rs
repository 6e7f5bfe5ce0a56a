//! Keeping the host's surfaces and bounds in step with the session.

use sessiondeck_common::{SessionError, Toast};
use tracing::{debug, info, warn};

use super::{ApplyReport, Initial, SessionController};
use crate::arrangement::View;

impl SessionController {
    /// Tell the host what the arrangement currently shows.
    pub(super) async fn sync_host(&self) {
        let view = self.state().arrangement.view();
        let host = &self.inner.host;
        let result = match &view {
            View::Empty => Ok(()),
            View::Single(id) => host.set_active_surface(id).await,
            View::Split(split) => {
                host.set_split_surfaces(&split.left_id, &split.right_id, split.ratio)
                    .await
            }
            View::Grid(grid) => host.set_grid_surfaces(grid).await,
        };
        if let Err(e) = result {
            warn!("host arrangement update failed: {e}");
            self.toast(Toast::error(format!("Display update failed: {e}")));
        }
    }

    /// Re-show every visible surface and re-assert the arrangement.
    ///
    /// Safe to repeat; surfaces that were already attached are unaffected.
    pub async fn reattach(&self) {
        let visible = self.state().arrangement.visible_ids();
        for id in &visible {
            if let Err(e) = self.inner.host.set_surface_visible(id, true).await {
                warn!(profile_id = %id, "reattach failed: {e}");
            }
        }
        self.sync_host().await;
        debug!(visible = visible.len(), "surfaces reattached");
    }

    /// The window was resized. Bounds follow once resizing settles.
    pub fn resize_window(&self, width: f64, height: f64) {
        self.inner.bounds.set_window_size(width, height);
        self.inner.bounds.schedule();
    }

    /// Show or hide the tab strip. The content area grows or shrinks to
    /// match.
    pub fn set_tab_strip_visible(&self, visible: bool) {
        self.state().tab_strip_visible = visible;
        self.inner
            .bounds
            .set_chrome_height(self.inner.settings.chrome_height(visible));
        self.inner.bounds.invalidate();
        self.inner.bounds.schedule();
    }

    /// Push the content bounds now, even if unchanged.
    pub async fn refresh_bounds(&self) {
        self.inner.bounds.cancel_pending();
        if let Err(e) = self.inner.bounds.push(true).await {
            warn!("bounds push failed: {e}");
        }
    }

    /// Hide the content area while an overlay such as a modal is open.
    pub async fn set_content_visible(&self, visible: bool) {
        if let Err(e) = self.inner.host.set_content_visible(visible).await {
            warn!(visible, "content visibility change failed: {e}");
            return;
        }
        if visible {
            self.refresh_bounds().await;
        }
    }

    /// Bring a new window to its first state.
    ///
    /// A layout queued for the next window takes precedence over `initial`.
    pub async fn start(&self, initial: Initial) -> Result<Option<ApplyReport>, SessionError> {
        self.refresh_bounds().await;

        if let Some(layout) = self.inner.store.take_pending().await {
            info!(layout_id = %layout.id, "applying queued layout");
            return self.apply_layout(layout).await.map(Some);
        }

        match initial {
            Initial::Empty => Ok(None),
            Initial::Layout(id) => self.apply_layout_by_id(&id).await.map(Some),
            Initial::Profile(id) => {
                self.open_tab(&id).await?;
                Ok(None)
            }
        }
    }
}
