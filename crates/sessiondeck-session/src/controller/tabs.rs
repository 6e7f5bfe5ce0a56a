//! Opening, closing, focusing and reordering tabs.

use sessiondeck_common::{is_valid_id, Event, NavDirection, SessionError, Side, Toast};
use tracing::{debug, info, warn};

use super::SessionController;
use crate::tab::Tab;

impl SessionController {
    /// Open a tab for `profile_id` and make it active.
    ///
    /// Opening a tab that is already open only focuses it, logging it back
    /// in first if it was logged out. If the host cannot attach the surface
    /// the tab is removed again and the error returned.
    pub async fn open_tab(&self, profile_id: &str) -> Result<(), SessionError> {
        if !is_valid_id(profile_id) {
            return Err(SessionError::InvalidProfile(profile_id.to_string()));
        }

        let existing = self.state().registry.get(profile_id).map(|t| t.logged_out);
        match existing {
            Some(true) => return self.login(profile_id).await,
            Some(false) => {
                self.activate(profile_id).await;
                return Ok(());
            }
            None => {}
        }

        let title = self.resolve_title(profile_id).await;
        if !self.state().registry.push(Tab::new(profile_id, title)) {
            // Opened by a concurrent call while the title was resolved.
            self.activate(profile_id).await;
            return Ok(());
        }
        self.emit(Event::TabsChanged);

        if let Err(e) = self.inner.host.create_or_attach_surface(profile_id).await {
            warn!(profile_id = %profile_id, "surface attach failed: {e}");
            self.state().registry.remove(profile_id);
            self.emit(Event::TabsChanged);
            self.toast(Toast::error(format!("Could not open {profile_id}: {e}")));
            return Err(e.into());
        }

        info!(profile_id = %profile_id, "tab opened");
        self.activate_on(profile_id, Side::Left).await;
        self.schedule_auto_save();
        Ok(())
    }

    /// Close the tab for `profile_id`. Returns `false` if it was not open.
    ///
    /// The split partner or the last cell of a collapsed grid takes over the
    /// view; otherwise the tab now at the closed position, or the one
    /// before it, becomes active.
    pub async fn close_tab(&self, profile_id: &str) -> Result<bool, SessionError> {
        let (closed, changes) = self.mutate(|state| {
            let (index, _) = state.registry.remove(profile_id)?;
            let survivor = state.arrangement.forget(profile_id);
            if state.arrangement.active_id().is_none() {
                let next = survivor.or_else(|| {
                    state
                        .registry
                        .at(index)
                        .or_else(|| index.checked_sub(1).and_then(|i| state.registry.at(i)))
                        .map(|t| t.profile_id.clone())
                });
                if let Some(next) = next {
                    state.arrangement.set_active(&next, Side::Left);
                }
            }
            Some(index)
        });
        if closed.is_none() {
            return Ok(false);
        }

        if let Err(e) = self.inner.host.destroy_surface(profile_id).await {
            warn!(profile_id = %profile_id, "surface destroy failed: {e}");
        }
        self.sync_host().await;

        info!(profile_id = %profile_id, "tab closed");
        self.emit(Event::TabsChanged);
        self.publish_changes(changes);
        self.schedule_auto_save();
        Ok(true)
    }

    /// Make an open tab active. In a split, `side` picks the half it takes.
    pub async fn set_active(&self, profile_id: &str, side: Side) -> Result<bool, SessionError> {
        if !self.state().is_open(profile_id) {
            return Err(SessionError::NotOpen(profile_id.to_string()));
        }
        Ok(self.activate_on(profile_id, side).await)
    }

    /// A click on a tab. In edit mode it toggles the logged-out flag instead
    /// of focusing.
    pub async fn click(&self, profile_id: &str, side: Side) -> Result<(), SessionError> {
        let (edit_mode, logged_out) = {
            let state = self.state();
            let tab = state
                .registry
                .get(profile_id)
                .ok_or_else(|| SessionError::NotOpen(profile_id.to_string()))?;
            (state.edit_mode, tab.logged_out)
        };

        match (edit_mode, logged_out) {
            (false, _) => self.set_active(profile_id, side).await.map(|_| ()),
            (true, true) => self.login(profile_id).await,
            (true, false) => self.logout(profile_id).await,
        }
    }

    pub fn set_edit_mode(&self, enabled: bool) {
        let changed = {
            let mut state = self.state();
            std::mem::replace(&mut state.edit_mode, enabled) != enabled
        };
        if changed {
            debug!(enabled, "edit mode toggled");
            self.emit(Event::TabsChanged);
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.state().edit_mode
    }

    /// Move to the previous or next tab, wrapping around.
    ///
    /// In a split the move starts from the member on `side` (default: the
    /// active side) and replaces that side. Returns the newly active id.
    pub async fn navigate(
        &self,
        direction: NavDirection,
        side: Option<Side>,
    ) -> Result<Option<String>, SessionError> {
        let target = {
            let state = self.state();
            let side = side.unwrap_or_else(|| state.arrangement.active_side());
            let current = match state.arrangement.split() {
                Some(split) => Some(match side {
                    Side::Left => split.left_id.as_str(),
                    Side::Right => split.right_id.as_str(),
                }),
                None => state.arrangement.active_id(),
            };
            current
                .and_then(|id| state.registry.neighbor(id, direction))
                .map(|next| (next.to_string(), side))
        };

        let Some((next, side)) = target else {
            return Ok(None);
        };
        self.activate_on(&next, side).await;
        Ok(Some(next))
    }

    /// Move `from_id` next to `to_id` in the tab strip.
    pub fn reorder(&self, from_id: &str, to_id: &str, after: bool) -> bool {
        let moved = self.state().registry.reorder(from_id, to_id, after);
        if moved {
            debug!(from = %from_id, to = %to_id, after, "tab reordered");
            self.emit(Event::TabsChanged);
            self.schedule_auto_save();
        }
        moved
    }

    /// Mark a tab logged out and show its login placeholder.
    ///
    /// The flag is rolled back if the host refuses.
    pub async fn logout(&self, profile_id: &str) -> Result<(), SessionError> {
        let was_logged_out = {
            let mut state = self.state();
            let tab = state
                .registry
                .get_mut(profile_id)
                .ok_or_else(|| SessionError::NotOpen(profile_id.to_string()))?;
            std::mem::replace(&mut tab.logged_out, true)
        };
        if was_logged_out {
            return Ok(());
        }

        if let Err(e) = self.inner.host.mark_logged_out(profile_id).await {
            warn!(profile_id = %profile_id, "logout failed: {e}");
            if let Some(tab) = self.state().registry.get_mut(profile_id) {
                tab.logged_out = false;
            }
            self.toast(Toast::error(format!("Could not log out {profile_id}: {e}")));
            return Err(e.into());
        }

        info!(profile_id = %profile_id, "tab logged out");
        self.emit(Event::TabsChanged);
        self.schedule_auto_save();
        Ok(())
    }

    /// Restore a logged-out tab's content and focus it.
    pub async fn login(&self, profile_id: &str) -> Result<(), SessionError> {
        if !self.state().is_open(profile_id) {
            return Err(SessionError::NotOpen(profile_id.to_string()));
        }

        if let Err(e) = self.inner.host.mark_logged_in(profile_id).await {
            warn!(profile_id = %profile_id, "login failed: {e}");
            self.toast(Toast::error(format!("Could not log in {profile_id}: {e}")));
            return Err(e.into());
        }

        let was_logged_out = self
            .state()
            .registry
            .get_mut(profile_id)
            .map(|tab| std::mem::replace(&mut tab.logged_out, false))
            .unwrap_or(false);
        if was_logged_out {
            info!(profile_id = %profile_id, "tab logged in");
            self.emit(Event::TabsChanged);
            self.schedule_auto_save();
        }
        self.activate(profile_id).await;
        Ok(())
    }

    /// Focus `profile_id`, keeping the split side it already occupies.
    async fn activate(&self, profile_id: &str) -> bool {
        let side = self
            .state()
            .arrangement
            .side_of(profile_id)
            .unwrap_or(Side::Left);
        self.activate_on(profile_id, side).await
    }

    async fn activate_on(&self, profile_id: &str, side: Side) -> bool {
        let (changed, changes) = self.mutate(|state| state.arrangement.set_active(profile_id, side));
        self.sync_host().await;
        self.publish_changes(changes);
        if changed {
            self.schedule_auto_save();
        }
        changed
    }

    /// Display title for a profile, from the cache or the profile directory.
    async fn resolve_title(&self, profile_id: &str) -> String {
        if let Some(title) = self.state().cached_title(profile_id) {
            return title.to_string();
        }
        match self.inner.profiles.list_profiles().await {
            Ok(profiles) => {
                let mut state = self.state();
                state.remember_titles(&profiles);
                state
                    .cached_title(profile_id)
                    .map_or_else(|| profile_id.to_string(), str::to_string)
            }
            Err(e) => {
                debug!(profile_id = %profile_id, "profile lookup failed: {e}");
                profile_id.to_string()
            }
        }
    }
}
