//! Layout application and split configuration types.

use serde::{Deserialize, Serialize};

/// Layout application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base pacing delay between sequential tab opens, in seconds (valid range: 0-30).
    pub delay_seconds: f64,
    /// Upper bound of the random jitter added to each pacing delay (valid range: 0-1000).
    pub jitter_ms: u64,
    /// Persist changes to a tracked layout automatically.
    pub auto_save: bool,
    /// Split ratio used when no layout supplies one (valid range: 0.2-0.8).
    pub default_split_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 2.0,
            jitter_ms: 50,
            auto_save: true,
            default_split_ratio: 0.5,
        }
    }
}
