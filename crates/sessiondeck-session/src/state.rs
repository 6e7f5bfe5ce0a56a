//! Per-window session state.

use std::collections::HashMap;

use sessiondeck_layout::{
    GridCell, GridLayout, GridShape, LayoutView, NamedGrid, SplitState, TabLayoutInput,
};

use crate::arrangement::{Arrangement, Badge};
use crate::host::ProfileSummary;
use crate::registry::TabRegistry;

/// Everything the engine knows about one window. Lives as long as the
/// window and starts empty.
#[derive(Debug)]
pub struct SessionState {
    pub registry: TabRegistry,
    pub arrangement: Arrangement,
    /// The layout this session keeps in sync, once one was applied or saved.
    pub current_layout_id: Option<String>,
    pub edit_mode: bool,
    pub tab_strip_visible: bool,
    titles: HashMap<String, String>,
}

impl SessionState {
    pub fn new(default_ratio: f64, tab_strip_visible: bool) -> Self {
        Self {
            registry: TabRegistry::new(),
            arrangement: Arrangement::new(default_ratio),
            current_layout_id: None,
            edit_mode: false,
            tab_strip_visible,
            titles: HashMap::new(),
        }
    }

    pub fn is_open(&self, profile_id: &str) -> bool {
        self.registry.contains(profile_id)
    }

    pub fn cached_title(&self, profile_id: &str) -> Option<&str> {
        self.titles.get(profile_id).map(String::as_str)
    }

    /// Cache profile names and refresh the titles of open tabs.
    pub fn remember_titles(&mut self, profiles: &[ProfileSummary]) {
        for profile in profiles {
            let title = if profile.name.trim().is_empty() {
                profile.id.clone()
            } else {
                profile.name.clone()
            };
            if let Some(tab) = self.registry.get_mut(&profile.id) {
                tab.title = title.clone();
            }
            self.titles.insert(profile.id.clone(), title);
        }
    }

    /// Drop all tabs and arrangement state. Returns the closed profile ids.
    pub fn reset(&mut self) -> Vec<String> {
        self.arrangement.reset();
        self.registry
            .clear()
            .into_iter()
            .map(|t| t.profile_id)
            .collect()
    }

    /// Show `grid`, pruned to open tabs.
    pub fn apply_grid(&mut self, grid: GridLayout) -> bool {
        let registry = &self.registry;
        self.arrangement
            .apply_grid(grid, |id| registry.contains(id))
    }

    /// The live session as a save request for the tracked layout. `None`
    /// when no tab is open.
    ///
    /// With grid tabs present a visible split is stored as the leading
    /// `split-2` entry, and `view` records whether a grid was showing.
    pub fn snapshot_input(&self) -> Option<TabLayoutInput> {
        if self.registry.is_empty() {
            return None;
        }
        let split = self.arrangement.split().cloned();
        let grids = self.arrangement.grids();
        let (layouts, view) = if grids.is_empty() {
            (Vec::new(), None)
        } else {
            let mut layouts = Vec::with_capacity(grids.len() + 1);
            let view = match self.arrangement.active_grid() {
                Some(index) => LayoutView::Grid(index),
                None => {
                    if let Some(split) = &split {
                        layouts.push(NamedGrid::new(self.split_entry(split)));
                    }
                    LayoutView::Tabs
                }
            };
            let offset = layouts.len();
            layouts.extend_from_slice(grids);
            let view = match view {
                LayoutView::Grid(index) => LayoutView::Grid(index + offset),
                tabs => tabs,
            };
            (layouts, Some(view))
        };
        Some(TabLayoutInput {
            id: self.current_layout_id.clone(),
            name: None,
            tabs: self.registry.ids(),
            split,
            active_id: self.arrangement.active_id().map(str::to_string),
            logged_out_chars: self.registry.logged_out_ids(),
            layouts,
            view,
        })
    }

    fn split_entry(&self, split: &SplitState) -> GridLayout {
        let mut grid = GridLayout::new(
            GridShape::Split2,
            vec![
                GridCell::new(split.left_id.clone(), 0),
                GridCell::new(split.right_id.clone(), 1),
            ],
        );
        let active = self.arrangement.active_id();
        grid.active_position = Some(usize::from(active == Some(split.right_id.as_str())));
        grid
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active_id = self.arrangement.active_id();
        SessionSnapshot {
            tabs: self
                .registry
                .tabs()
                .iter()
                .map(|t| TabView {
                    profile_id: t.profile_id.clone(),
                    title: t.title.clone(),
                    logged_out: t.logged_out,
                    badge: self.arrangement.badge(&t.profile_id),
                    active: active_id == Some(t.profile_id.as_str()),
                })
                .collect(),
            active_id: active_id.map(str::to_string),
            split: self.arrangement.split().cloned(),
            grids: self.arrangement.grids().to_vec(),
            active_grid: self.arrangement.active_grid(),
            ratio: self.arrangement.ratio(),
            current_layout_id: self.current_layout_id.clone(),
            edit_mode: self.edit_mode,
            tab_strip_visible: self.tab_strip_visible,
        }
    }
}

/// One tab as the tab strip draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub profile_id: String,
    pub title: String,
    pub logged_out: bool,
    pub badge: Option<Badge>,
    pub active: bool,
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub tabs: Vec<TabView>,
    pub active_id: Option<String>,
    pub split: Option<SplitState>,
    pub grids: Vec<NamedGrid>,
    pub active_grid: Option<usize>,
    pub ratio: f64,
    pub current_layout_id: Option<String>,
    pub edit_mode: bool,
    pub tab_strip_visible: bool,
}

impl SessionSnapshot {
    pub fn tab_ids(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.profile_id.as_str()).collect()
    }

    pub fn logged_out_ids(&self) -> Vec<&str> {
        self.tabs
            .iter()
            .filter(|t| t.logged_out)
            .map(|t| t.profile_id.as_str())
            .collect()
    }
}
