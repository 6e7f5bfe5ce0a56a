//! Saving the session as a layout and keeping the tracked layout current.

use chrono::Local;
use sessiondeck_common::{Event, SessionError, Toast};
use sessiondeck_layout::TabLayout;
use tracing::{debug, error, info};

use super::SessionController;

impl SessionController {
    /// Default name offered when saving, e.g. `Layout 2024-05-01 14:30`.
    pub fn suggested_layout_name(&self) -> String {
        format!("Layout {}", Local::now().format("%Y-%m-%d %H:%M"))
    }

    /// Save the session as a new layout.
    ///
    /// A session that does not track a layout yet starts tracking the new
    /// one.
    pub async fn save_current_layout(&self, name: Option<&str>) -> Result<TabLayout, SessionError> {
        let Some(mut input) = self.state().snapshot_input() else {
            self.toast(Toast::error("Open a tab before saving a layout"));
            return Err(SessionError::EmptySession);
        };
        input.id = None;
        input.name = name.map(str::to_string);

        let result = {
            let _guard = self.inner.save_lock.lock().await;
            self.inner.store.save(input).await
        };
        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                error!("layout save failed: {e}");
                self.toast(Toast::error(format!("Could not save layout: {e}")));
                return Err(e.into());
            }
        };

        {
            let mut state = self.state();
            if state.current_layout_id.is_none() {
                state.current_layout_id = Some(saved.id.clone());
            }
        }
        info!(layout_id = %saved.id, name = %saved.name, "layout saved");
        self.emit(Event::LayoutsChanged);
        self.toast(Toast::success(format!("Saved layout {}", saved.name)));
        Ok(saved)
    }

    pub async fn rename_layout(&self, layout_id: &str, name: &str) -> Result<TabLayout, SessionError> {
        let renamed = {
            let _guard = self.inner.save_lock.lock().await;
            self.inner.store.rename(layout_id, name).await
        };
        match renamed {
            Ok(layout) => {
                info!(layout_id = %layout_id, name = %layout.name, "layout renamed");
                self.emit(Event::LayoutsChanged);
                Ok(layout)
            }
            Err(e) => {
                self.toast(Toast::error(format!("Could not rename layout: {e}")));
                Err(e.into())
            }
        }
    }

    /// Delete a stored layout. A session tracking it stops tracking.
    pub async fn delete_layout(&self, layout_id: &str) -> Result<bool, SessionError> {
        let removed = {
            let _guard = self.inner.save_lock.lock().await;
            self.inner.store.delete(layout_id).await?
        };
        if !removed {
            return Ok(false);
        }

        let was_tracked = {
            let mut state = self.state();
            let tracked = state.current_layout_id.as_deref() == Some(layout_id);
            if tracked {
                state.current_layout_id = None;
            }
            tracked
        };
        if was_tracked {
            self.inner.autosave.cancel();
            self.inner.ratio_commit.cancel();
        }
        info!(layout_id = %layout_id, "layout deleted");
        self.emit(Event::LayoutsChanged);
        Ok(true)
    }

    pub async fn list_layouts(&self) -> Result<Vec<TabLayout>, SessionError> {
        Ok(self.inner.store.list().await?)
    }

    /// Queue a layout for the next window to apply on start.
    pub async fn queue_for_next_window(&self, layout: TabLayout) {
        debug!(layout_id = %layout.id, "layout queued for next window");
        self.inner.store.set_pending(layout).await;
    }

    /// Persist the tracked layout once changes have settled.
    ///
    /// Does nothing while auto-save is off, no layout is tracked, or a
    /// layout apply is running.
    pub fn schedule_auto_save(&self) {
        if !self.inner.settings.auto_save {
            self.inner.autosave.cancel();
            return;
        }
        if self.is_applying() || self.state().current_layout_id.is_none() {
            return;
        }

        let weak = self.downgrade();
        self.inner.autosave.schedule(move || async move {
            if let Some(controller) = SessionController::from_weak(&weak) {
                let _ = controller.persist_tracked().await;
            }
        });
    }

    /// Persist the tracked layout now, dropping any pending auto-save.
    pub async fn auto_save_now(&self) -> Result<Option<TabLayout>, SessionError> {
        self.inner.autosave.cancel();
        self.persist_tracked().await
    }

    pub(super) fn schedule_ratio_commit(&self) {
        if !self.inner.settings.auto_save || self.state().current_layout_id.is_none() {
            return;
        }
        let weak = self.downgrade();
        self.inner.ratio_commit.schedule(move || async move {
            if let Some(controller) = SessionController::from_weak(&weak) {
                let _ = controller.persist_tracked().await;
            }
        });
    }

    /// Write the live session over the tracked layout.
    async fn persist_tracked(&self) -> Result<Option<TabLayout>, SessionError> {
        if !self.inner.settings.auto_save || self.is_applying() {
            return Ok(None);
        }
        let input = {
            let state = self.state();
            let Some(tracked) = state.current_layout_id.as_deref() else {
                return Ok(None);
            };
            match state.snapshot_input() {
                Some(input) => input,
                None => {
                    debug!(layout_id = %tracked, "no open tabs, auto-save skipped");
                    return Ok(None);
                }
            }
        };
        let tracked = input.id.clone();

        let result = {
            let _guard = self.inner.save_lock.lock().await;
            self.inner.store.save(input).await
        };
        match result {
            Ok(saved) => {
                {
                    let mut state = self.state();
                    if state.current_layout_id == tracked {
                        state.current_layout_id = Some(saved.id.clone());
                    }
                }
                debug!(layout_id = %saved.id, "tracked layout saved");
                self.emit(Event::LayoutsChanged);
                Ok(Some(saved))
            }
            Err(e) => {
                error!(layout_id = ?tracked, "auto-save failed: {e}");
                self.toast(Toast::error(format!("Auto-save failed: {e}")));
                Err(e.into())
            }
        }
    }
}
