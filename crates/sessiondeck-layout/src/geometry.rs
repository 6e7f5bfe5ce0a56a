//! Per-surface rectangles for split and grid arrangements.

use sessiondeck_common::Rect;

use crate::model::{clamp_ratio, GridLayout, SplitState};

/// Divides the content rectangle between visible surfaces.
#[derive(Debug, Clone, Copy)]
pub struct LayoutGeometry {
    /// Gap in pixels between neighbouring surfaces.
    pub gap: u32,
}

impl Default for LayoutGeometry {
    fn default() -> Self {
        Self { gap: 8 }
    }
}

impl LayoutGeometry {
    pub fn new(gap: u32) -> Self {
        Self { gap }
    }

    /// Left and right rectangles for a split. `ratio` is the left share of
    /// the width left over after the gap.
    pub fn split_rects(&self, bounds: Rect, ratio: f64) -> (Rect, Rect) {
        let available = bounds.width.saturating_sub(self.gap);
        let left_width = (f64::from(available) * clamp_ratio(ratio)).round() as u32;
        let right_width = available.saturating_sub(left_width);
        (
            Rect::new(bounds.x, bounds.y, left_width, bounds.height),
            Rect::new(
                bounds.x + (left_width + self.gap) as i32,
                bounds.y,
                right_width,
                bounds.height,
            ),
        )
    }

    pub fn split_layout(&self, bounds: Rect, split: &SplitState) -> Vec<(String, Rect)> {
        let (left, right) = self.split_rects(bounds, split.ratio);
        vec![
            (split.left_id.clone(), left),
            (split.right_id.clone(), right),
        ]
    }

    /// Rectangle of every cell, in position order. Slots fill row-major.
    pub fn grid_layout(&self, bounds: Rect, grid: &GridLayout) -> Vec<(String, Rect)> {
        let desc = grid.shape.descriptor();
        let cols = desc.cols as u32;
        let rows = desc.rows as u32;
        let cell_width = bounds.width.saturating_sub(self.gap * (cols - 1)) / cols;
        let cell_height = bounds.height.saturating_sub(self.gap * (rows - 1)) / rows;

        grid.cells
            .iter()
            .map(|cell| {
                let row = (cell.position / desc.cols) as u32;
                let col = (cell.position % desc.cols) as u32;
                let rect = Rect::new(
                    bounds.x + (col * (cell_width + self.gap)) as i32,
                    bounds.y + (row * (cell_height + self.gap)) as i32,
                    cell_width,
                    cell_height,
                );
                (cell.id.clone(), rect)
            })
            .collect()
    }
}
