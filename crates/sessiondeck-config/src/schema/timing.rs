//! Debounce and reattachment timing configuration.

use serde::{Deserialize, Serialize};

/// Timer settings, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Coalescing window for bounds pushes (valid range: 0-1000).
    pub bounds_debounce_ms: u64,
    /// Coalescing window for auto-save of a tracked layout (valid range: 0-10000).
    pub auto_save_debounce_ms: u64,
    /// Delay before a committed split-ratio change is persisted (valid range: 0-10000).
    pub ratio_commit_debounce_ms: u64,
    /// Delays of the repeat reattachment passes after a layout apply.
    pub reattach_delays_ms: Vec<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            bounds_debounce_ms: 50,
            auto_save_debounce_ms: 500,
            ratio_commit_debounce_ms: 500,
            reattach_delays_ms: vec![200, 500],
        }
    }
}
