//! Rebuilding a session from a stored layout.
//!
//! Applies are queued: a second apply waits until the first has fully
//! settled, finally phase included. While one runs, auto-save is held off
//! so the half-built session never overwrites the layout being restored.

use sessiondeck_common::{Event, NotificationLevel, SessionError};
use sessiondeck_layout::{NamedGrid, RestoreView, TabLayout};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{ApplyingGuard, SessionController};


/// Outcome of one layout apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub layout_id: String,
    /// Opened tabs, in strip order.
    pub opened: Vec<String>,
    /// Ids that resolved but whose surface could not be attached.
    pub failed: Vec<String>,
    /// Ids that no longer name a known profile.
    pub dropped: Vec<String>,
}

impl SessionController {
    /// Load a stored layout and apply it.
    pub async fn apply_layout_by_id(&self, layout_id: &str) -> Result<ApplyReport, SessionError> {
        match self.inner.store.get(layout_id).await {
            Ok(Some(layout)) => self.apply_layout(layout).await,
            Ok(None) => {
                warn!(layout_id = %layout_id, "layout to apply not found");
                self.status(
                    NotificationLevel::Error,
                    format!("Layout {layout_id} no longer exists"),
                );
                Err(SessionError::LayoutNotFound(layout_id.to_string()))
            }
            Err(e) => {
                self.status(NotificationLevel::Error, format!("Could not load layout: {e}"));
                Err(e.into())
            }
        }
    }

    /// Replace the session with `layout` and start tracking it.
    pub async fn apply_layout(&self, layout: TabLayout) -> Result<ApplyReport, SessionError> {
        let _queue = self.inner.apply_queue.lock().await;
        let _applying = ApplyingGuard::engage(&self.inner.applying);

        self.inner.autosave.cancel();
        self.inner.ratio_commit.cancel();
        self.state().current_layout_id = Some(layout.id.clone());
        info!(layout_id = %layout.id, name = %layout.name, "applying layout");

        let result = self.run_apply(layout).await;
        self.finish_apply().await;

        match &result {
            Ok(report) => {
                info!(
                    layout_id = %report.layout_id,
                    opened = report.opened.len(),
                    failed = report.failed.len(),
                    dropped = report.dropped.len(),
                    "layout applied"
                );
                self.emit(Event::LayoutApplied {
                    layout_id: report.layout_id.clone(),
                });
                if report.opened.is_empty() {
                    self.status(NotificationLevel::Error, "No tabs of this layout could be opened");
                } else if !report.failed.is_empty() || !report.dropped.is_empty() {
                    self.status(
                        NotificationLevel::Info,
                        format!(
                            "Layout applied, {} tab(s) skipped",
                            report.failed.len() + report.dropped.len()
                        ),
                    );
                }
            }
            Err(e) => {
                warn!("layout apply aborted: {e}");
                self.status(NotificationLevel::Error, format!("Could not apply layout: {e}"));
            }
        }
        result
    }

    async fn run_apply(&self, layout: TabLayout) -> Result<ApplyReport, SessionError> {
        let host = &self.inner.host;
        let pacing = &self.inner.settings.pacing;

        if let Err(e) = host.set_content_visible(false).await {
            warn!("hiding content failed: {e}");
        }
        self.reset_session().await;

        let layout_id = layout.id.clone();
        let Some(layout) = layout.normalized() else {
            return Err(SessionError::InvalidLayout(format!("{layout_id} has no tabs")));
        };
        let plan = layout.restore_plan();
        let (resolved, dropped) = self.resolve_ids(&plan.open_order).await;
        if resolved.is_empty() {
            return Err(SessionError::InvalidLayout(format!(
                "none of the tabs in {layout_id} exist"
            )));
        }

        if let Err(e) = host.set_content_visible(true).await {
            warn!("revealing content failed: {e}");
        }
        self.refresh_bounds().await;

        let mut report = ApplyReport {
            layout_id,
            dropped,
            ..ApplyReport::default()
        };
        for (i, id) in resolved.iter().enumerate() {
            if i > 0 {
                pacing.wait().await;
            }
            match self.open_tab(id).await {
                Ok(()) => report.opened.push(id.clone()),
                Err(e) => {
                    warn!(profile_id = %id, "skipping tab: {e}");
                    report.failed.push(id.clone());
                }
            }
        }

        for id in &layout.logged_out_chars {
            if report.opened.contains(id) {
                // Failures roll back and toast inside logout.
                let _ = self.logout(id).await;
            }
        }

        let open: HashSet<String> = self.state().registry.ids().into_iter().collect();
        let split = plan
            .split
            .filter(|s| open.contains(&s.left_id) && open.contains(&s.right_id));

        let mut grids = Vec::with_capacity(plan.grids.len());
        let mut shown = None;
        for (index, entry) in plan.grids.into_iter().enumerate() {
            let complete = entry.layout.ids().all(|id| open.contains(id));
            let Some(grid) = entry.layout.retain_ids(|id| open.contains(id)) else {
                continue;
            };
            if grid.cells.len() < 2 {
                continue;
            }
            let show = match plan.view {
                RestoreView::FirstCompleteGrid => complete && shown.is_none() && split.is_none(),
                RestoreView::Grid(wanted) => wanted == index,
                RestoreView::Tabs => false,
            };
            if show {
                shown = Some(grids.len());
            }
            grids.push(NamedGrid {
                name: entry.name,
                layout: grid,
            });
        }
        debug!(grids = grids.len(), shown = ?shown, view = ?plan.view, "grids restored");
        self.mutate(|state| {
            state.arrangement.set_grids(grids);
            if let Some(index) = shown {
                state.arrangement.show_grid(index);
            }
        });

        match split.filter(|_| shown.is_none()) {
            Some(split) => {
                pacing.wait().await;
                debug!(left = %split.left_id, right = %split.right_id, ratio = split.ratio, "split restored");
                self.mutate(|state| state.arrangement.set_split(split));
            }
            None => {
                self.mutate(|state| state.arrangement.clear_split());
            }
        }

        let active = layout
            .active_id
            .filter(|id| open.contains(id))
            .or_else(|| report.opened.first().cloned());
        if let Some(active) = active {
            self.mutate(|state| state.arrangement.focus(&active));
        }
        self.sync_host().await;

        self.emit(Event::TabsChanged);
        self.emit(Event::ActiveChanged {
            active_id: self.active_id(),
        });
        self.emit(Event::SplitChanged);
        Ok(report)
    }

    /// Destroy every surface and clear the local session.
    async fn reset_session(&self) {
        let closed = self.state().reset();
        for id in &closed {
            if let Err(e) = self.inner.host.destroy_surface(id).await {
                warn!(profile_id = %id, "surface destroy failed: {e}");
            }
        }
        if !closed.is_empty() {
            debug!(closed = closed.len(), "session reset");
            self.emit(Event::TabsChanged);
        }
    }

    /// Split `ids` into those naming a known profile and those that do not.
    ///
    /// Without usable profile metadata every id is tried as given.
    async fn resolve_ids(&self, ids: &[String]) -> (Vec<String>, Vec<String>) {
        let profiles = match self.inner.profiles.list_profiles().await {
            Ok(profiles) if !profiles.is_empty() => profiles,
            Ok(_) => {
                debug!("profile directory empty, opening ids as given");
                return (ids.to_vec(), Vec::new());
            }
            Err(e) => {
                warn!("profile directory unavailable, opening ids as given: {e}");
                return (ids.to_vec(), Vec::new());
            }
        };
        self.state().remember_titles(&profiles);

        let known: HashSet<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        let (resolved, dropped): (Vec<String>, Vec<String>) =
            ids.iter().cloned().partition(|id| known.contains(id.as_str()));
        if resolved.is_empty() {
            debug!("no layout id matches a profile, opening ids as given");
            return (ids.to_vec(), Vec::new());
        }
        for id in &dropped {
            info!(profile_id = %id, "dropping tab for unknown profile");
        }
        (resolved, dropped)
    }

    /// Always runs after an apply, successful or not.
    async fn finish_apply(&self) {
        if let Err(e) = self.inner.host.set_content_visible(true).await {
            warn!("revealing content failed: {e}");
        }
        self.refresh_bounds().await;
        self.reattach().await;

        let weak = self.downgrade();
        let passes: Vec<_> = self
            .inner
            .settings
            .reattach_delays
            .iter()
            .map(|delay| {
                let weak = weak.clone();
                let delay = *delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(controller) = SessionController::from_weak(&weak) {
                        controller.reattach().await;
                    }
                })
            })
            .collect();

        let mut tasks = self
            .inner
            .reattach_tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.extend(passes);
    }
}
