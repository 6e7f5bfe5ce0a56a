//! Engine settings derived from the loaded configuration.

use sessiondeck_common::WindowMetrics;
use sessiondeck_config::SessionDeckConfig;
use std::time::Duration;

use crate::pacing::Pacing;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub pacing: Pacing,
    pub auto_save: bool,
    pub default_split_ratio: f64,
    pub bounds_debounce: Duration,
    pub auto_save_debounce: Duration,
    pub ratio_commit_debounce: Duration,
    pub reattach_delays: Vec<Duration>,
    pub tab_strip_height: f64,
    pub tab_strip_visible: bool,
    pub window: WindowMetrics,
}

impl EngineSettings {
    pub fn from_config(config: &SessionDeckConfig) -> Self {
        let tab_strip_height = f64::from(config.chrome.tab_strip_height);
        let tab_strip_visible = config.chrome.tab_strip_visible;
        Self {
            pacing: Pacing::new(config.layout.delay_seconds, config.layout.jitter_ms),
            auto_save: config.layout.auto_save,
            default_split_ratio: config.layout.default_split_ratio,
            bounds_debounce: Duration::from_millis(config.timing.bounds_debounce_ms),
            auto_save_debounce: Duration::from_millis(config.timing.auto_save_debounce_ms),
            ratio_commit_debounce: Duration::from_millis(config.timing.ratio_commit_debounce_ms),
            reattach_delays: config
                .timing
                .reattach_delays_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
            tab_strip_height,
            tab_strip_visible,
            window: WindowMetrics {
                width: f64::from(config.chrome.window_width),
                height: f64::from(config.chrome.window_height),
                chrome_height: if tab_strip_visible { tab_strip_height } else { 0.0 },
            },
        }
    }

    /// Chrome height for the given tab strip visibility.
    pub fn chrome_height(&self, tab_strip_visible: bool) -> f64 {
        if tab_strip_visible {
            self.tab_strip_height
        } else {
            0.0
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&SessionDeckConfig::default())
    }
}
