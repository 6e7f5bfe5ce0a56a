//! Grid shape catalogue.
//!
//! Each shape maps to a fixed `rows x cols` slot grid and a cap on how many
//! cells may show at once. Some shapes leave slots empty (`grid-5` uses five
//! of its six slots).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static dimensions of a grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeDescriptor {
    pub rows: usize,
    pub cols: usize,
    pub max_cells: usize,
}

impl ShapeDescriptor {
    const fn new(rows: usize, cols: usize, max_cells: usize) -> Self {
        Self {
            rows,
            cols,
            max_cells,
        }
    }

    /// Number of addressable positions.
    pub fn slots(&self) -> usize {
        self.rows * self.cols
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridShape {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "split-2")]
    Split2,
    #[serde(rename = "row-3")]
    Row3,
    #[serde(rename = "row-4")]
    Row4,
    #[serde(rename = "grid-4")]
    Grid4,
    #[serde(rename = "grid-5")]
    Grid5,
    #[serde(rename = "grid-6")]
    Grid6,
    #[serde(rename = "grid-7")]
    Grid7,
    #[serde(rename = "grid-8")]
    Grid8,
}

impl GridShape {
    pub const ALL: [GridShape; 9] = [
        GridShape::Single,
        GridShape::Split2,
        GridShape::Row3,
        GridShape::Row4,
        GridShape::Grid4,
        GridShape::Grid5,
        GridShape::Grid6,
        GridShape::Grid7,
        GridShape::Grid8,
    ];

    pub fn descriptor(self) -> ShapeDescriptor {
        match self {
            GridShape::Single => ShapeDescriptor::new(1, 1, 1),
            GridShape::Split2 => ShapeDescriptor::new(1, 2, 2),
            GridShape::Row3 => ShapeDescriptor::new(1, 3, 3),
            GridShape::Row4 => ShapeDescriptor::new(1, 4, 4),
            GridShape::Grid4 => ShapeDescriptor::new(2, 2, 4),
            GridShape::Grid5 => ShapeDescriptor::new(2, 3, 5),
            GridShape::Grid6 => ShapeDescriptor::new(2, 3, 6),
            GridShape::Grid7 => ShapeDescriptor::new(2, 4, 7),
            GridShape::Grid8 => ShapeDescriptor::new(2, 4, 8),
        }
    }

    pub fn max_cells(self) -> usize {
        self.descriptor().max_cells
    }

    pub fn slots(self) -> usize {
        self.descriptor().slots()
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            GridShape::Single => "single",
            GridShape::Split2 => "split-2",
            GridShape::Row3 => "row-3",
            GridShape::Row4 => "row-4",
            GridShape::Grid4 => "grid-4",
            GridShape::Grid5 => "grid-5",
            GridShape::Grid6 => "grid-6",
            GridShape::Grid7 => "grid-7",
            GridShape::Grid8 => "grid-8",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.wire_name() == name)
    }

    /// Shape used for an ad-hoc grid of `count` cells. Four cells get the
    /// 2x2 grid rather than a single row; counts past eight use `grid-8`.
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => GridShape::Single,
            2 => GridShape::Split2,
            3 => GridShape::Row3,
            4 => GridShape::Grid4,
            5 => GridShape::Grid5,
            6 => GridShape::Grid6,
            7 => GridShape::Grid7,
            _ => GridShape::Grid8,
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
