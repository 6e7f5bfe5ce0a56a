//! Two-way split pair.

use serde::{Deserialize, Serialize};

pub const MIN_SPLIT_RATIO: f64 = 0.2;
pub const MAX_SPLIT_RATIO: f64 = 0.8;
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Clamp a split ratio into `[0.2, 0.8]`. Non-finite input yields the default.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
    } else {
        DEFAULT_SPLIT_RATIO
    }
}

fn default_ratio() -> f64 {
    DEFAULT_SPLIT_RATIO
}

/// Left/right pair shown side by side. `ratio` is the left share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitState {
    pub left_id: String,
    pub right_id: String,
    #[serde(default = "default_ratio")]
    pub ratio: f64,
}

impl SplitState {
    /// Build a split, or `None` when both sides name the same profile.
    pub fn new(left_id: impl Into<String>, right_id: impl Into<String>, ratio: f64) -> Option<Self> {
        let left_id = left_id.into();
        let right_id = right_id.into();
        if left_id == right_id {
            return None;
        }
        Some(Self {
            left_id,
            right_id,
            ratio: clamp_ratio(ratio),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.left_id == id || self.right_id == id
    }

    /// The member that is not `id`, if `id` is a member.
    pub fn partner_of(&self, id: &str) -> Option<&str> {
        if self.left_id == id {
            Some(&self.right_id)
        } else if self.right_id == id {
            Some(&self.left_id)
        } else {
            None
        }
    }

    pub(crate) fn normalized(mut self) -> Option<Self> {
        if self.left_id == self.right_id {
            return None;
        }
        self.ratio = clamp_ratio(self.ratio);
        Some(self)
    }
}
