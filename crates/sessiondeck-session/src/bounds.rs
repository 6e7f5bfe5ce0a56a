//! Content-area rectangle and its pushes to the host.

use sessiondeck_common::{HostError, Rect, WindowMetrics};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::host::SurfaceHost;

/// The area below the tab strip, rounded to whole pixels. Never less than
/// one pixel tall.
pub fn content_rect(metrics: &WindowMetrics) -> Rect {
    let chrome = metrics.chrome_height.max(0.0).round();
    let width = metrics.width.max(0.0).round();
    let height = (metrics.height - chrome).round().max(1.0);
    Rect::new(0, chrome as i32, width as u32, height as u32)
}

#[derive(Debug, Default)]
struct BoundsState {
    metrics: WindowMetrics,
    last_pushed: Option<Rect>,
}

/// Keeps the host's content bounds in step with the window.
pub struct BoundsSync {
    host: Arc<dyn SurfaceHost>,
    state: Mutex<BoundsState>,
    debouncer: Debouncer,
}

impl BoundsSync {
    pub fn new(host: Arc<dyn SurfaceHost>, metrics: WindowMetrics, debounce: Duration) -> Self {
        Self {
            host,
            state: Mutex::new(BoundsState {
                metrics,
                last_pushed: None,
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, BoundsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn metrics(&self) -> WindowMetrics {
        self.state().metrics
    }

    pub fn current_rect(&self) -> Rect {
        content_rect(&self.state().metrics)
    }

    pub fn last_pushed(&self) -> Option<Rect> {
        self.state().last_pushed
    }

    pub fn set_window_size(&self, width: f64, height: f64) {
        let mut state = self.state();
        state.metrics.width = width;
        state.metrics.height = height;
    }

    pub fn set_chrome_height(&self, chrome_height: f64) {
        self.state().metrics.chrome_height = chrome_height;
    }

    /// Forget the last pushed rectangle so the next push always goes out.
    pub fn invalidate(&self) {
        self.state().last_pushed = None;
    }

    /// Push the current rectangle now.
    ///
    /// Unless `force` is set, a rectangle equal to the last one pushed is
    /// skipped. Returns whether the host was called.
    pub async fn push(&self, force: bool) -> Result<bool, HostError> {
        let rect = {
            let state = self.state();
            let rect = content_rect(&state.metrics);
            if !force && state.last_pushed == Some(rect) {
                return Ok(false);
            }
            rect
        };

        self.host.set_surface_bounds(rect).await?;
        self.state().last_pushed = Some(rect);
        debug!(%rect, force, "content bounds pushed");
        Ok(true)
    }

    /// Push once the window has been quiet for the debounce delay.
    pub fn schedule(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.debouncer.schedule(move || async move {
            let Some(this) = weak.upgrade() else {
                return;
            };
            if let Err(e) = this.push(false).await {
                tracing::warn!("bounds push failed: {e}");
            }
        });
    }

    pub fn cancel_pending(&self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HostCall, RecordingHost};

    fn metrics(width: f64, height: f64, chrome: f64) -> WindowMetrics {
        WindowMetrics {
            width,
            height,
            chrome_height: chrome,
        }
    }

    #[test]
    fn content_rect_sits_below_chrome() {
        assert_eq!(
            content_rect(&metrics(1200.0, 760.0, 36.0)),
            Rect::new(0, 36, 1200, 724)
        );
    }

    #[test]
    fn content_rect_rounds_and_keeps_one_pixel() {
        assert_eq!(
            content_rect(&metrics(1199.6, 700.4, 36.2)),
            Rect::new(0, 36, 1200, 664)
        );
        assert_eq!(content_rect(&metrics(300.0, 20.0, 36.0)).height, 1);
        assert_eq!(content_rect(&metrics(300.0, 500.0, 0.0)).y, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unforced_push_skips_identical_rect() {
        let host = RecordingHost::new();
        let sync = BoundsSync::new(host.clone(), WindowMetrics::default(), Duration::from_millis(50));

        assert!(sync.push(false).await.unwrap());
        assert!(!sync.push(false).await.unwrap());
        assert!(sync.push(true).await.unwrap());

        sync.invalidate();
        assert!(sync.push(false).await.unwrap());
        assert_eq!(host.bounds().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_resizes_coalesce_into_one_push() {
        let host = RecordingHost::new();
        let sync = Arc::new(BoundsSync::new(
            host.clone(),
            WindowMetrics::default(),
            Duration::from_millis(50),
        ));

        for step in 0..10 {
            sync.set_window_size(1000.0 + f64::from(step) * 10.0, 700.0);
            sync.schedule();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(host.bounds().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(host.bounds(), vec![Rect::new(0, 36, 1090, 664)]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_push_is_retried_next_time() {
        let host = RecordingHost::new();
        let sync = BoundsSync::new(host.clone(), WindowMetrics::default(), Duration::from_millis(50));

        host.fail_command("set_surface_bounds", true);
        assert!(sync.push(false).await.is_err());
        assert_eq!(sync.last_pushed(), None);

        host.fail_command("set_surface_bounds", false);
        assert!(sync.push(false).await.unwrap());
        assert!(matches!(host.calls().last(), Some(HostCall::Bounds(_))));
    }
}
