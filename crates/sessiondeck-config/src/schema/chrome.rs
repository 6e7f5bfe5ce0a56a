//! Window chrome metrics.

use serde::{Deserialize, Serialize};

/// Tab strip and content spacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Height of the tab strip in pixels (valid range: 0-200).
    pub tab_strip_height: u32,
    /// Whether the tab strip starts visible.
    pub tab_strip_visible: bool,
    /// Gap between split halves and grid cells in pixels (valid range: 0-64).
    pub split_gap: u32,
    /// Initial window width in pixels (valid range: 200-16384).
    pub window_width: u32,
    /// Initial window height in pixels (valid range: 150-16384).
    pub window_height: u32,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            tab_strip_height: 36,
            tab_strip_visible: true,
            split_gap: 8,
            window_width: 1280,
            window_height: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_config_defaults() {
        let config = ChromeConfig::default();
        assert_eq!(config.tab_strip_height, 36);
        assert!(config.tab_strip_visible);
        assert_eq!(config.split_gap, 8);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 800);
    }
}
