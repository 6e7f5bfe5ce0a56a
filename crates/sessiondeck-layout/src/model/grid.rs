//! Grid arrangement of several profiles.

use serde::{Deserialize, Deserializer, Serialize};
use sessiondeck_common::is_valid_id;
use std::collections::HashSet;

use crate::shape::GridShape;

/// One profile placed at a slot of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: String,
    #[serde(deserialize_with = "de_position")]
    pub position: usize,
}

impl GridCell {
    pub fn new(id: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    #[serde(rename = "type")]
    pub shape: GridShape,
    pub cells: Vec<GridCell>,
    #[serde(default, deserialize_with = "de_opt_position")]
    pub active_position: Option<usize>,
}

impl GridLayout {
    pub fn new(shape: GridShape, cells: Vec<GridCell>) -> Self {
        Self {
            shape,
            cells,
            active_position: None,
        }
    }

    /// Lay `ids` out in reading order on the smallest fitting shape.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<GridCell> = ids
            .into_iter()
            .enumerate()
            .map(|(position, id)| GridCell::new(id, position))
            .collect();
        Self::new(GridShape::for_count(cells.len()), cells)
    }

    /// Clean up a grid read from disk or built by a caller.
    ///
    /// Positions are clamped into the shape's slots, duplicate positions keep
    /// the first cell, cells are sorted by position, a profile keeps only its
    /// lowest position, and the result is capped at the shape's maximum. An
    /// empty result is `None`. The active position falls back to the first
    /// cell when it names no cell.
    pub fn normalize(self) -> Option<GridLayout> {
        let desc = self.shape.descriptor();
        let last_slot = desc.slots().saturating_sub(1);

        let mut taken = HashSet::new();
        let mut cells: Vec<GridCell> = self
            .cells
            .into_iter()
            .filter(|c| is_valid_id(&c.id))
            .map(|c| GridCell {
                position: c.position.min(last_slot),
                ..c
            })
            .filter(|c| taken.insert(c.position))
            .collect();
        cells.sort_by_key(|c| c.position);

        let mut seen = HashSet::new();
        cells.retain(|c| seen.insert(c.id.clone()));
        cells.truncate(desc.max_cells);

        let first = cells.first()?.position;
        let active_position = match self.active_position {
            Some(pos) if cells.iter().any(|c| c.position == pos) => pos,
            _ => first,
        };

        Some(GridLayout {
            shape: self.shape,
            cells,
            active_position: Some(active_position),
        })
    }

    /// Profile ids in position order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.iter().any(|c| c.id == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.cells.iter().find(|c| c.id == id).map(|c| c.position)
    }

    /// Profile in the active cell.
    pub fn active_id(&self) -> Option<&str> {
        let pos = self.active_position?;
        self.cells
            .iter()
            .find(|c| c.position == pos)
            .map(|c| c.id.as_str())
    }

    /// Drop cells whose profile fails `keep`, then renormalize.
    pub fn retain_ids(mut self, keep: impl Fn(&str) -> bool) -> Option<GridLayout> {
        self.cells.retain(|c| keep(&c.id));
        self.normalize()
    }
}

fn position_from_f64(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.floor() as usize
    } else {
        0
    }
}

// Stored positions may be negative or fractional; both clamp rather than fail.
fn de_position<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(position_from_f64)
}

fn de_opt_position<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(position_from_f64))
}
