//! Split and grid arrangement.

use sessiondeck_common::{Event, SessionError};
use sessiondeck_layout::{GridLayout, SplitState};
use tracing::{debug, warn};

use super::SessionController;
use crate::arrangement::Badge;

impl SessionController {
    /// Pair the active tab (left) with `other_id` (right).
    pub async fn split_with(&self, other_id: &str) -> Result<bool, SessionError> {
        if !self.state().is_open(other_id) {
            return Err(SessionError::NotOpen(other_id.to_string()));
        }
        let (paired, changes) = self.mutate(|state| state.arrangement.split_with(other_id));
        if paired {
            debug!(right = %other_id, "split created");
            self.after_arrangement(changes).await;
        }
        Ok(paired)
    }

    /// Show `pair` as a split, or return to single view with `None`.
    ///
    /// Both ids must be open and distinct. The split keeps the current
    /// ratio.
    pub async fn apply_split(&self, pair: Option<(&str, &str)>) -> bool {
        let (applied, changes) = self.mutate(|state| match pair {
            Some((left, right)) => {
                if !state.is_open(left) || !state.is_open(right) {
                    return false;
                }
                let ratio = state.arrangement.ratio();
                match SplitState::new(left, right, ratio) {
                    Some(split) => {
                        state.arrangement.set_split(split);
                        true
                    }
                    None => false,
                }
            }
            None => state.arrangement.clear_split(),
        });
        if applied {
            self.after_arrangement(changes).await;
        }
        applied
    }

    /// Move the split divider. Returns the clamped ratio.
    ///
    /// The host is updated on every call; `commit` marks the end of a drag
    /// and persists the ratio after a quiet period. Without a split only the
    /// ratio used for the next split changes.
    pub async fn set_split_ratio(&self, ratio: f64, commit: bool) -> f64 {
        let (ratio, split) = {
            let mut state = self.state();
            let ratio = state.arrangement.set_ratio(ratio);
            (ratio, state.arrangement.split().cloned())
        };

        let Some(split) = split else {
            return ratio;
        };
        if let Err(e) = self
            .inner
            .host
            .set_split_surfaces(&split.left_id, &split.right_id, ratio)
            .await
        {
            warn!("split ratio update failed: {e}");
        }
        self.emit(Event::SplitChanged);
        if commit {
            self.schedule_ratio_commit();
        }
        ratio
    }

    /// Show `grid` pruned to open tabs, or leave the shown grid with `None`.
    pub async fn apply_grid(&self, grid: Option<GridLayout>) -> bool {
        let (applied, changes) = self.mutate(|state| match grid {
            Some(grid) => state.apply_grid(grid),
            None => state.arrangement.leave_grid(),
        });
        if applied {
            self.after_arrangement(changes).await;
        }
        applied
    }

    /// Show a saved grid tab by index.
    pub async fn select_grid(&self, index: usize) -> bool {
        let (shown, changes) = self.mutate(|state| state.arrangement.show_grid(index));
        if shown {
            self.after_arrangement(changes).await;
        }
        shown
    }

    pub fn badge(&self, profile_id: &str) -> Option<Badge> {
        self.state().arrangement.badge(profile_id)
    }

    /// Profiles currently shown, in display order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.state().arrangement.visible_ids()
    }

    pub fn split_ratio(&self) -> f64 {
        self.state().arrangement.ratio()
    }

    async fn after_arrangement(&self, changes: super::Changes) {
        self.sync_host().await;
        self.publish_changes(changes);
        if changes.any() {
            self.schedule_auto_save();
        }
    }
}
