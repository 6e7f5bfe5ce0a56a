//! Single / split / grid state machine.
//!
//! Tracks which profiles are visible and how the content area is shared.
//! Tabs are referred to by profile id only; whether an id is open is the
//! registry's business and is passed in where it matters.

use sessiondeck_common::Side;
use sessiondeck_layout::{clamp_ratio, GridLayout, GridShape, NamedGrid, SplitState};

/// Marker drawn on a tab that is part of the visible arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Left,
    Right,
    /// 1-based grid cell position.
    Cell(usize),
}

impl Badge {
    pub fn label(&self) -> String {
        match self {
            Badge::Left => "L".to_string(),
            Badge::Right => "R".to_string(),
            Badge::Cell(n) => n.to_string(),
        }
    }
}

/// What the host should currently be showing.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Empty,
    Single(String),
    Split(SplitState),
    Grid(GridLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    active_id: Option<String>,
    split: Option<SplitState>,
    grids: Vec<NamedGrid>,
    active_grid: Option<usize>,
    ratio: f64,
    default_ratio: f64,
}

impl Arrangement {
    pub fn new(default_ratio: f64) -> Self {
        let default_ratio = clamp_ratio(default_ratio);
        Self {
            active_id: None,
            split: None,
            grids: Vec::new(),
            active_grid: None,
            ratio: default_ratio,
            default_ratio,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn split(&self) -> Option<&SplitState> {
        self.split.as_ref()
    }

    pub fn grids(&self) -> &[NamedGrid] {
        &self.grids
    }

    pub fn active_grid(&self) -> Option<usize> {
        self.active_grid
    }

    pub fn shown_grid(&self) -> Option<&GridLayout> {
        self.active_grid
            .and_then(|i| self.grids.get(i))
            .map(|g| &g.layout)
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn view(&self) -> View {
        if let Some(grid) = self.shown_grid() {
            View::Grid(grid.clone())
        } else if let Some(split) = &self.split {
            View::Split(split.clone())
        } else {
            match &self.active_id {
                Some(id) => View::Single(id.clone()),
                None => View::Empty,
            }
        }
    }

    /// Ordered list of visible profiles.
    pub fn visible_ids(&self) -> Vec<String> {
        match self.view() {
            View::Empty => Vec::new(),
            View::Single(id) => vec![id],
            View::Split(split) => vec![split.left_id, split.right_id],
            View::Grid(grid) => grid.ids().map(str::to_string).collect(),
        }
    }

    pub fn badge(&self, id: &str) -> Option<Badge> {
        if let Some(grid) = self.shown_grid() {
            return grid.position_of(id).map(|p| Badge::Cell(p + 1));
        }
        let split = self.split.as_ref()?;
        if split.left_id == id {
            Some(Badge::Left)
        } else if split.right_id == id {
            Some(Badge::Right)
        } else {
            None
        }
    }

    /// The side the active tab sits on. `Left` outside a split.
    pub fn active_side(&self) -> Side {
        match (&self.split, &self.active_id) {
            (Some(split), Some(active)) if split.right_id == *active => Side::Right,
            _ => Side::Left,
        }
    }

    pub fn side_of(&self, id: &str) -> Option<Side> {
        match self.badge(id)? {
            Badge::Left => Some(Side::Left),
            Badge::Right => Some(Side::Right),
            Badge::Cell(_) => None,
        }
    }

    /// Make `id` the active tab.
    ///
    /// In a split, `side` is re-targeted to `id`; if `id` already holds the
    /// other side the two sides swap. In a grid, a member cell becomes the
    /// active cell and any other id leaves the grid for single view.
    pub fn set_active(&mut self, id: &str, side: Side) -> bool {
        let before = self.clone();

        if let Some(idx) = self.active_grid {
            let grid = &mut self.grids[idx].layout;
            match grid.position_of(id) {
                Some(pos) => grid.active_position = Some(pos),
                None => self.active_grid = None,
            }
        } else if let Some(SplitState {
            left_id, right_id, ..
        }) = self.split.as_mut()
        {
            let (target, other) = match side {
                Side::Left => (left_id, right_id),
                Side::Right => (right_id, left_id),
            };
            if target.as_str() != id {
                if other.as_str() == id {
                    std::mem::swap(target, other);
                } else {
                    *target = id.to_string();
                }
            }
        }
        self.active_id = Some(id.to_string());

        *self != before
    }

    /// Focus `id` without rearranging.
    ///
    /// A member of the visible split or grid becomes active in place. Any
    /// other id leaves the split or grid untouched and focuses its first
    /// member instead.
    pub fn focus(&mut self, id: &str) {
        if let Some(idx) = self.active_grid {
            let grid = &mut self.grids[idx].layout;
            if let Some(pos) = grid.position_of(id) {
                grid.active_position = Some(pos);
            }
            self.active_id = grid.active_id().map(str::to_string);
        } else if let Some(split) = &self.split {
            let target = if split.contains(id) {
                id
            } else {
                split.left_id.as_str()
            };
            self.active_id = Some(target.to_string());
        } else {
            self.active_id = Some(id.to_string());
        }
    }

    /// Pair the active tab (left) with `other` (right).
    pub fn split_with(&mut self, other: &str) -> bool {
        let Some(active) = self.active_id.clone() else {
            return false;
        };
        let Some(split) = SplitState::new(active, other, self.ratio) else {
            return false;
        };
        self.active_grid = None;
        self.split = Some(split);
        true
    }

    /// Show `split`, leaving any grid. The left member becomes active.
    pub fn set_split(&mut self, split: SplitState) {
        self.ratio = split.ratio;
        self.active_grid = None;
        self.active_id = Some(split.left_id.clone());
        self.split = Some(split);
    }

    /// Return to single view, keeping whichever tab is active.
    pub fn clear_split(&mut self) -> bool {
        self.split.take().is_some()
    }

    pub fn set_ratio(&mut self, ratio: f64) -> f64 {
        let ratio = clamp_ratio(ratio);
        self.ratio = ratio;
        if let Some(split) = self.split.as_mut() {
            split.ratio = ratio;
        }
        ratio
    }

    /// Show an arbitrary grid of open tabs.
    ///
    /// Cells failing `is_open` are pruned first. Two cells on a `split-2`
    /// become a split; a single remaining cell becomes single view.
    pub fn apply_grid(&mut self, grid: GridLayout, is_open: impl Fn(&str) -> bool) -> bool {
        let Some(grid) = grid.retain_ids(is_open) else {
            return false;
        };

        match (grid.shape, grid.cells.len()) {
            (_, 1) | (GridShape::Single, _) => {
                self.active_grid = None;
                self.split = None;
                self.active_id = Some(grid.cells[0].id.clone());
            }
            (GridShape::Split2, 2) => {
                if let Some(split) =
                    SplitState::new(grid.cells[0].id.clone(), grid.cells[1].id.clone(), self.ratio)
                {
                    self.set_split(split);
                }
            }
            _ => {
                let idx = self.add_grid(NamedGrid::new(grid));
                self.show_grid(idx);
            }
        }
        true
    }

    /// Keep `grid` as a grid tab, reusing an identical one.
    pub fn add_grid(&mut self, grid: NamedGrid) -> usize {
        if let Some(idx) = self
            .grids
            .iter()
            .position(|g| g.layout.shape == grid.layout.shape && g.layout.cells == grid.layout.cells)
        {
            return idx;
        }
        self.grids.push(grid);
        self.grids.len() - 1
    }

    /// Show the grid tab at `index`.
    pub fn show_grid(&mut self, index: usize) -> bool {
        let Some(grid) = self.grids.get(index) else {
            return false;
        };
        self.active_id = grid.layout.active_id().map(str::to_string);
        self.split = None;
        self.active_grid = Some(index);
        true
    }

    pub fn leave_grid(&mut self) -> bool {
        self.active_grid.take().is_some()
    }

    /// Drop every reference to a closed tab.
    ///
    /// Returns the tab that should take over the view: the split partner, or
    /// the last cell of a shown grid that collapsed. A grid left with two or
    /// more cells stays shown.
    pub fn forget(&mut self, id: &str) -> Option<String> {
        let mut survivor = None;
        if let Some(partner) = self.split.as_ref().and_then(|s| s.partner_of(id)) {
            survivor = Some(partner.to_string());
            self.split = None;
        }

        let shown = self.active_grid.take();
        let mut kept = Vec::with_capacity(self.grids.len());
        for (i, entry) in std::mem::take(&mut self.grids).into_iter().enumerate() {
            let was_shown = shown == Some(i);
            match entry.layout.retain_ids(|cell| cell != id) {
                Some(layout) if layout.cells.len() > 1 => {
                    if was_shown {
                        self.active_grid = Some(kept.len());
                    }
                    kept.push(NamedGrid {
                        name: entry.name,
                        layout,
                    });
                }
                Some(layout) if was_shown => {
                    survivor = survivor.or_else(|| layout.active_id().map(str::to_string));
                }
                _ => {}
            }
        }
        self.grids = kept;

        if self.active_id.as_deref() == Some(id) {
            self.active_id = self
                .shown_grid()
                .and_then(|g| g.active_id())
                .map(str::to_string);
        }
        survivor
    }

    /// Clear everything. The ratio returns to its default.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_ratio);
    }

    pub fn set_grids(&mut self, grids: Vec<NamedGrid>) {
        self.grids = grids;
        self.active_grid = None;
    }
}
