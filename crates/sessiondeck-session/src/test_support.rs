//! Fakes shared by the engine tests.

use async_trait::async_trait;
use sessiondeck_common::{HostError, Rect, StoreError};
use sessiondeck_layout::{GridLayout, LayoutStore, MemoryLayoutStore, TabLayout, TabLayoutInput};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::controller::SessionController;
use crate::host::{ProfileDirectory, ProfileSummary, SurfaceHost};
use crate::pacing::Pacing;
use crate::settings::EngineSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create(String),
    Destroy(String),
    SurfaceVisible(String, bool),
    ContentVisible(bool),
    Bounds(Rect),
    Active(String),
    Split(String, String, f64),
    Grid(Vec<String>),
    LoggedOut(String),
    LoggedIn(String),
}

/// Host that records every call and fails on request.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    failing_commands: Mutex<HashSet<String>>,
    failing_attach: Mutex<HashSet<String>>,
    latency: Mutex<Option<Duration>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn bounds(&self) -> Vec<Rect> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Bounds(rect) => Some(rect),
                _ => None,
            })
            .collect()
    }

    pub fn content_visibility(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::ContentVisible(visible) => Some(visible),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Create(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// The most recent single, split or grid arrangement sent.
    pub fn last_arrangement(&self) -> Option<HostCall> {
        self.calls().into_iter().rev().find(|c| {
            matches!(
                c,
                HostCall::Active(_) | HostCall::Split(..) | HostCall::Grid(_)
            )
        })
    }

    /// Make every call of `command` (the trait method name) fail.
    pub fn fail_command(&self, command: &str, fail: bool) {
        let mut failing = self.failing_commands.lock().unwrap();
        if fail {
            failing.insert(command.to_string());
        } else {
            failing.remove(command);
        }
    }

    pub fn fail_attach_for(&self, profile_id: &str) {
        self.failing_attach
            .lock()
            .unwrap()
            .insert(profile_id.to_string());
    }

    /// Delay every call, to widen interleaving windows.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    async fn record(&self, command: &'static str, call: HostCall) -> Result<(), HostError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.calls.lock().unwrap().push(call);
        if self.failing_commands.lock().unwrap().contains(command) {
            return Err(HostError::Rejected {
                command,
                reason: "refused by test".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SurfaceHost for RecordingHost {
    async fn create_or_attach_surface(&self, profile_id: &str) -> Result<(), HostError> {
        self.record("create_or_attach_surface", HostCall::Create(profile_id.into()))
            .await?;
        if self.failing_attach.lock().unwrap().contains(profile_id) {
            return Err(HostError::AttachFailed {
                profile_id: profile_id.into(),
                reason: "no such character".into(),
            });
        }
        Ok(())
    }

    async fn destroy_surface(&self, profile_id: &str) -> Result<(), HostError> {
        self.record("destroy_surface", HostCall::Destroy(profile_id.into()))
            .await
    }

    async fn set_surface_visible(&self, profile_id: &str, visible: bool) -> Result<(), HostError> {
        self.record(
            "set_surface_visible",
            HostCall::SurfaceVisible(profile_id.into(), visible),
        )
        .await
    }

    async fn set_content_visible(&self, visible: bool) -> Result<(), HostError> {
        self.record("set_content_visible", HostCall::ContentVisible(visible))
            .await
    }

    async fn set_surface_bounds(&self, rect: Rect) -> Result<(), HostError> {
        self.record("set_surface_bounds", HostCall::Bounds(rect)).await
    }

    async fn set_active_surface(&self, profile_id: &str) -> Result<(), HostError> {
        self.record("set_active_surface", HostCall::Active(profile_id.into()))
            .await
    }

    async fn set_split_surfaces(
        &self,
        left_id: &str,
        right_id: &str,
        ratio: f64,
    ) -> Result<(), HostError> {
        self.record(
            "set_split_surfaces",
            HostCall::Split(left_id.into(), right_id.into(), ratio),
        )
        .await
    }

    async fn set_grid_surfaces(&self, grid: &GridLayout) -> Result<(), HostError> {
        let ids = grid.ids().map(str::to_string).collect();
        self.record("set_grid_surfaces", HostCall::Grid(ids)).await
    }

    async fn mark_logged_out(&self, profile_id: &str) -> Result<(), HostError> {
        self.record("mark_logged_out", HostCall::LoggedOut(profile_id.into()))
            .await
    }

    async fn mark_logged_in(&self, profile_id: &str) -> Result<(), HostError> {
        self.record("mark_logged_in", HostCall::LoggedIn(profile_id.into()))
            .await
    }
}

/// Fixed profile list, or an unreachable directory.
pub struct StaticProfiles {
    profiles: Mutex<Option<Vec<ProfileSummary>>>,
}

impl StaticProfiles {
    pub fn new(ids: &[&str]) -> Arc<Self> {
        let profiles = ids
            .iter()
            .map(|id| ProfileSummary::new(*id, format!("Name {id}")))
            .collect();
        Arc::new(Self {
            profiles: Mutex::new(Some(profiles)),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            profiles: Mutex::new(None),
        })
    }
}

#[async_trait]
impl ProfileDirectory for StaticProfiles {
    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, HostError> {
        self.profiles
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| HostError::Unavailable("profile directory offline".into()))
    }
}

/// In-memory store whose saves can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryLayoutStore,
    fail_saves: AtomicBool,
}

impl FlakyStore {
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LayoutStore for FlakyStore {
    async fn list(&self) -> Result<Vec<TabLayout>, StoreError> {
        self.inner.list().await
    }

    async fn get(&self, id: &str) -> Result<Option<TabLayout>, StoreError> {
        self.inner.get(id).await
    }

    async fn save(&self, input: TabLayoutInput) -> Result<TabLayout, StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.save(input).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(id).await
    }

    async fn rename(&self, id: &str, name: &str) -> Result<TabLayout, StoreError> {
        self.inner.rename(id, name).await
    }

    async fn take_pending(&self) -> Option<TabLayout> {
        self.inner.take_pending().await
    }

    async fn set_pending(&self, layout: TabLayout) {
        self.inner.set_pending(layout).await
    }
}

/// Default settings with pacing and reattach passes kept, as configured.
pub fn settings() -> EngineSettings {
    EngineSettings::default()
}

/// Settings without pacing delays.
pub fn fast_settings() -> EngineSettings {
    EngineSettings {
        pacing: Pacing::none(),
        ..EngineSettings::default()
    }
}

pub struct Fixture {
    pub host: Arc<RecordingHost>,
    pub store: Arc<FlakyStore>,
    pub controller: SessionController,
}

pub fn fixture(profile_ids: &[&str]) -> Fixture {
    fixture_with(settings(), StaticProfiles::new(profile_ids))
}

pub fn fixture_with(settings: EngineSettings, profiles: Arc<StaticProfiles>) -> Fixture {
    let host = RecordingHost::new();
    let store = Arc::new(FlakyStore::default());
    let controller = SessionController::new(host.clone(), store.clone(), profiles, settings);
    Fixture {
        host,
        store,
        controller,
    }
}

/// A stored-looking layout document.
pub fn layout(id: &str, tabs: &[&str]) -> TabLayout {
    TabLayout {
        id: id.to_string(),
        name: format!("Layout {id}"),
        created_at: "2024-05-01T12:00:00.000Z".to_string(),
        updated_at: "2024-05-01T12:00:00.000Z".to_string(),
        tabs: tabs.iter().map(|t| t.to_string()).collect(),
        split: None,
        active_id: None,
        logged_out_chars: Vec::new(),
        layouts: Vec::new(),
        view: None,
    }
}
