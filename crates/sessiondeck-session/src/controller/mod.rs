//! Per-window session engine.
//!
//! [`SessionController`] owns the tab strip and its arrangement, drives the
//! host through [`SurfaceHost`], and keeps the tracked layout saved. All
//! state sits behind one short-lived lock that is never held across an
//! await; host calls happen after the state change they reflect.

mod apply;
mod arrange;
mod persist;
mod sync;
mod tabs;

#[cfg(test)]
mod tests;

pub use apply::ApplyReport;

use sessiondeck_common::{Event, EventBus, NotificationLevel, Subscription, Toast};
use sessiondeck_layout::{GridLayout, LayoutStore, SplitState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;

use crate::bounds::BoundsSync;
use crate::debounce::Debouncer;
use crate::host::{ProfileDirectory, SurfaceHost};
use crate::settings::EngineSettings;
use crate::state::{SessionSnapshot, SessionState};

/// What a new window shows first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initial {
    Empty,
    Layout(String),
    Profile(String),
}

/// Handle to one window's session. Clones share the same session.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<SessionState>,
    host: Arc<dyn SurfaceHost>,
    store: Arc<dyn LayoutStore>,
    profiles: Arc<dyn ProfileDirectory>,
    events: EventBus,
    bounds: Arc<BoundsSync>,
    autosave: Debouncer,
    ratio_commit: Debouncer,
    /// Serializes layout applies.
    apply_queue: tokio::sync::Mutex<()>,
    applying: AtomicBool,
    /// Serializes store writes issued by this session.
    save_lock: tokio::sync::Mutex<()>,
    reattach_tasks: Mutex<Vec<JoinHandle<()>>>,
    settings: EngineSettings,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let tasks = self
            .reattach_tasks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

/// Before/after picture used to decide which change events to publish.
#[derive(PartialEq)]
struct ViewKey {
    active_id: Option<String>,
    split: Option<SplitState>,
    grid: Option<GridLayout>,
}

impl ViewKey {
    fn of(state: &SessionState) -> Self {
        Self {
            active_id: state.arrangement.active_id().map(str::to_string),
            split: state.arrangement.split().cloned(),
            grid: state.arrangement.shown_grid().cloned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Changes {
    active: bool,
    arrangement: bool,
}

impl Changes {
    fn between(before: &ViewKey, after: &ViewKey) -> Self {
        Self {
            active: before.active_id != after.active_id,
            arrangement: before.split != after.split || before.grid != after.grid,
        }
    }

    fn any(self) -> bool {
        self.active || self.arrangement
    }
}

impl SessionController {
    pub fn new(
        host: Arc<dyn SurfaceHost>,
        store: Arc<dyn LayoutStore>,
        profiles: Arc<dyn ProfileDirectory>,
        settings: EngineSettings,
    ) -> Self {
        let bounds = Arc::new(BoundsSync::new(
            Arc::clone(&host),
            settings.window,
            settings.bounds_debounce,
        ));
        let state = SessionState::new(settings.default_split_ratio, settings.tab_strip_visible);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                host,
                store,
                profiles,
                events: EventBus::default(),
                bounds,
                autosave: Debouncer::new(settings.auto_save_debounce),
                ratio_commit: Debouncer::new(settings.ratio_commit_debounce),
                apply_queue: tokio::sync::Mutex::new(()),
                applying: AtomicBool::new(false),
                save_lock: tokio::sync::Mutex::new(()),
                reattach_tasks: Mutex::new(Vec::new()),
                settings,
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the state and report what it changed in the view.
    fn mutate<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> (R, Changes) {
        let mut state = self.state();
        let before = ViewKey::of(&state);
        let out = f(&mut state);
        let changes = Changes::between(&before, &ViewKey::of(&state));
        (out, changes)
    }

    fn publish_changes(&self, changes: Changes) {
        if changes.active {
            let active_id = self.state().arrangement.active_id().map(str::to_string);
            self.emit(Event::ActiveChanged { active_id });
        }
        if changes.arrangement {
            self.emit(Event::SplitChanged);
        }
    }

    fn emit(&self, event: Event) {
        self.inner.events.publish(event);
    }

    fn toast(&self, toast: Toast) {
        self.emit(toast.into());
    }

    fn status(&self, level: NotificationLevel, message: impl Into<String>) {
        self.emit(Event::LayoutStatus {
            level,
            message: message.into(),
        });
    }

    pub fn subscribe(&self) -> Subscription {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.inner.settings
    }

    pub fn tab_ids(&self) -> Vec<String> {
        self.state().registry.ids()
    }

    pub fn active_id(&self) -> Option<String> {
        self.state().arrangement.active_id().map(str::to_string)
    }

    pub fn current_layout_id(&self) -> Option<String> {
        self.state().current_layout_id.clone()
    }

    /// Whether a layout apply is in progress.
    pub fn is_applying(&self) -> bool {
        self.inner.applying.load(Ordering::SeqCst)
    }
}

/// Raises the applying flag for as long as it lives.
struct ApplyingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ApplyingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
