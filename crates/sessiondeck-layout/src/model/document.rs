//! The persisted layout document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sessiondeck_common::{is_valid_id, is_valid_name, StoreError, MAX_NAME_LENGTH};
use std::collections::HashSet;
use tracing::warn;

use super::grid::GridLayout;
use super::split::{SplitState, DEFAULT_SPLIT_RATIO};
use crate::shape::GridShape;

/// Default name for a layout saved without one.
pub fn default_layout_name(now: DateTime<Utc>) -> String {
    format!("Layout {}", now.to_rfc3339_opts(SecondsFormat::Secs, true))
}

pub(crate) fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Which part of a layout was on screen when it was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutView {
    /// The tab strip's own view: the active tab or the split pair.
    Tabs,
    /// The grid tab at this index of `layouts`.
    Grid(usize),
}

/// A grid kept as a tab of its own, optionally named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGrid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layout: GridLayout,
}

impl NamedGrid {
    pub fn new(layout: GridLayout) -> Self {
        Self { name: None, layout }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabLayout {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub tabs: Vec<String>,
    pub split: Option<SplitState>,
    pub active_id: Option<String>,
    #[serde(default)]
    pub logged_out_chars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<NamedGrid>,
    /// Absent in documents written before the view was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<LayoutView>,
}

/// The view an apply ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreView {
    /// No recorded view: the first grid whose cells all opened, unless a
    /// split is restored.
    FirstCompleteGrid,
    Tabs,
    /// Index into [`RestorePlan::grids`].
    Grid(usize),
}

/// What an apply needs to rebuild a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RestorePlan {
    /// Every profile to open, in tab order.
    pub open_order: Vec<String>,
    /// Grids to keep as grid tabs. Two-cell splits are folded into `split`.
    pub grids: Vec<NamedGrid>,
    pub split: Option<SplitState>,
    pub view: RestoreView,
}

impl TabLayout {
    /// Read one stored entry, tolerating older and hand-edited documents.
    ///
    /// Entries without a usable id or without any valid tab are rejected.
    /// A legacy `split` holding a grid is converted: a two-cell `split-2`
    /// becomes a split pair, anything else becomes a grid entry.
    pub fn from_value(value: Value) -> Option<TabLayout> {
        let raw: RawLayout = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping unreadable layout entry: {e}");
                return None;
            }
        };
        raw.into_layout()
    }

    /// Bring a layout into its canonical form, or `None` if it has no tabs.
    pub fn normalized(mut self) -> Option<TabLayout> {
        let wanted = match self.view {
            Some(LayoutView::Grid(index)) => Some(index),
            _ => None,
        };
        let mut view = self.view.map(|_| LayoutView::Tabs);
        let mut layouts = Vec::with_capacity(self.layouts.len());
        for (index, entry) in self.layouts.into_iter().enumerate() {
            let Some(layout) = entry.layout.normalize() else {
                continue;
            };
            if wanted == Some(index) {
                view = Some(LayoutView::Grid(layouts.len()));
            }
            layouts.push(NamedGrid {
                name: entry.name.filter(|n| is_valid_name(n)),
                layout,
            });
        }
        self.view = if layouts.is_empty() { None } else { view };
        self.layouts = layouts;

        let mut seen = HashSet::new();
        let grid_ids: Vec<String> = self
            .layouts
            .iter()
            .flat_map(|g| g.layout.ids().map(str::to_string).collect::<Vec<_>>())
            .collect();
        self.tabs = self
            .tabs
            .into_iter()
            .chain(grid_ids)
            .filter(|id| is_valid_id(id) && seen.insert(id.clone()))
            .collect();
        if self.tabs.is_empty() {
            return None;
        }

        self.split = self.split.and_then(SplitState::normalized);
        let open: HashSet<&str> = self.tabs.iter().map(String::as_str).collect();
        self.active_id = self.active_id.filter(|id| open.contains(id.as_str()));
        let mut marked = HashSet::new();
        self.logged_out_chars
            .retain(|id| open.contains(id.as_str()) && marked.insert(id.clone()));
        if !is_valid_name(&self.name) {
            self.name = self.name.chars().take(MAX_NAME_LENGTH).collect();
        }
        if self.name.trim().is_empty() {
            self.name = format!("Layout {}", self.created_at);
        }
        Some(self)
    }

    pub fn is_logged_out(&self, id: &str) -> bool {
        self.logged_out_chars.iter().any(|c| c == id)
    }

    /// Split the document into the pieces an apply restores.
    ///
    /// When grids are present the legacy `split` field is ignored; only its
    /// ratio is reused for a `split-2` entry.
    pub fn restore_plan(&self) -> RestorePlan {
        if self.layouts.is_empty() {
            return RestorePlan {
                open_order: self.tabs.clone(),
                grids: Vec::new(),
                split: self.split.clone(),
                view: RestoreView::Tabs,
            };
        }

        let mut view = match self.view {
            None => RestoreView::FirstCompleteGrid,
            Some(_) => RestoreView::Tabs,
        };
        let mut split = None;
        let mut grids = Vec::new();
        for (index, entry) in self.layouts.iter().enumerate() {
            if self.view == Some(LayoutView::Grid(index))
                && entry.layout.cells.len() > 1
                && !matches!(entry.layout.shape, GridShape::Split2 | GridShape::Single)
            {
                view = RestoreView::Grid(grids.len());
            }
            match entry.layout.shape {
                GridShape::Split2 if entry.layout.cells.len() == 2 => {
                    if split.is_none() {
                        let ratio = self.split.as_ref().map_or(DEFAULT_SPLIT_RATIO, |s| s.ratio);
                        split = SplitState::new(
                            entry.layout.cells[0].id.clone(),
                            entry.layout.cells[1].id.clone(),
                            ratio,
                        );
                    }
                }
                GridShape::Single => {}
                _ if entry.layout.cells.len() > 1 => grids.push(entry.clone()),
                _ => {}
            }
        }

        RestorePlan {
            open_order: self.tabs.clone(),
            grids,
            split,
            view,
        }
    }
}

/// Caller-supplied content of a save.
///
/// An `id` naming a stored layout updates it in place; anything else
/// creates a new layout. An empty `name` on update keeps the stored name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabLayoutInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub tabs: Vec<String>,
    #[serde(default)]
    pub split: Option<SplitState>,
    #[serde(default)]
    pub active_id: Option<String>,
    #[serde(default)]
    pub logged_out_chars: Vec<String>,
    #[serde(default)]
    pub layouts: Vec<NamedGrid>,
    #[serde(default)]
    pub view: Option<LayoutView>,
}

impl TabLayoutInput {
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(id) = &self.id {
            if !is_valid_id(id) {
                return Err(StoreError::Invalid(format!("invalid layout id {id:?}")));
            }
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            if !is_valid_name(name) {
                return Err(StoreError::Invalid(format!(
                    "layout name must be 1..={MAX_NAME_LENGTH} characters"
                )));
            }
        }
        if self.tabs.is_empty() {
            return Err(StoreError::Invalid("layout has no tabs".into()));
        }
        if let Some(bad) = self.tabs.iter().find(|t| !is_valid_id(t)) {
            return Err(StoreError::Invalid(format!("invalid profile id {bad:?}")));
        }
        Ok(())
    }

    /// The non-empty name, if one was given.
    pub fn given_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub(crate) fn into_layout(
        self,
        id: String,
        name: String,
        created_at: String,
        updated_at: String,
    ) -> Option<TabLayout> {
        TabLayout {
            id,
            name,
            created_at,
            updated_at,
            tabs: self.tabs,
            split: self.split,
            active_id: self.active_id,
            logged_out_chars: self.logged_out_chars,
            layouts: self.layouts,
            view: self.view,
        }
        .normalized()
    }
}

impl From<&TabLayout> for TabLayoutInput {
    fn from(layout: &TabLayout) -> Self {
        Self {
            id: Some(layout.id.clone()),
            name: Some(layout.name.clone()),
            tabs: layout.tabs.clone(),
            split: layout.split.clone(),
            active_id: layout.active_id.clone(),
            logged_out_chars: layout.logged_out_chars.clone(),
            layouts: layout.layouts.clone(),
            view: layout.view,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayout {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    tabs: Vec<Value>,
    #[serde(default)]
    split: Value,
    #[serde(default)]
    active_id: Option<String>,
    #[serde(default)]
    logged_out_chars: Vec<Value>,
    #[serde(default)]
    layouts: Vec<Value>,
    #[serde(default)]
    view: Value,
}

impl RawLayout {
    fn into_layout(self) -> Option<TabLayout> {
        if !is_valid_id(&self.id) {
            warn!(id = %self.id, "skipping layout with invalid id");
            return None;
        }

        let now = timestamp(Utc::now());
        let created_at = self
            .created_at
            .or_else(|| self.updated_at.clone())
            .unwrap_or_else(|| now.clone());
        let updated_at = self.updated_at.unwrap_or_else(|| created_at.clone());

        let (split, legacy_grid) = parse_split(self.split);
        let recorded = parse_view(self.view);
        let mut view = recorded.map(|_| LayoutView::Tabs);
        let mut layouts: Vec<NamedGrid> = Vec::with_capacity(self.layouts.len());
        for (index, value) in self.layouts.into_iter().enumerate() {
            match serde_json::from_value::<NamedGrid>(value) {
                Ok(grid) => {
                    if recorded == Some(LayoutView::Grid(index)) {
                        view = Some(LayoutView::Grid(layouts.len()));
                    }
                    layouts.push(grid);
                }
                Err(e) => warn!(layout_id = %self.id, "dropping unreadable grid: {e}"),
            }
        }
        if layouts.is_empty() {
            layouts.extend(legacy_grid.map(NamedGrid::new));
        }

        let layout = TabLayout {
            id: self.id.clone(),
            name: self.name.unwrap_or_default(),
            created_at,
            updated_at,
            tabs: strings(self.tabs),
            split,
            active_id: self.active_id,
            logged_out_chars: strings(self.logged_out_chars),
            layouts,
            view,
        }
        .normalized();

        if layout.is_none() {
            warn!(id = %self.id, "skipping layout without tabs");
        }
        layout
    }
}

fn strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn parse_view(value: Value) -> Option<LayoutView> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(view) => Some(view),
        Err(e) => {
            warn!("ignoring unreadable layout view: {e}");
            None
        }
    }
}

fn parse_split(value: Value) -> (Option<SplitState>, Option<GridLayout>) {
    if !value.is_object() {
        return (None, None);
    }
    if value.get("type").is_some() {
        let ratio = value
            .get("ratio")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SPLIT_RATIO);
        let grid = match serde_json::from_value::<GridLayout>(value) {
            Ok(grid) => grid.normalize(),
            Err(e) => {
                warn!("dropping unreadable legacy split grid: {e}");
                None
            }
        };
        return match grid {
            Some(g) if g.shape == GridShape::Split2 && g.cells.len() == 2 => (
                SplitState::new(g.cells[0].id.clone(), g.cells[1].id.clone(), ratio),
                None,
            ),
            other => (None, other),
        };
    }
    match serde_json::from_value::<SplitState>(value) {
        Ok(split) => (split.normalized(), None),
        Err(e) => {
            warn!("dropping unreadable split: {e}");
            (None, None)
        }
    }
}
