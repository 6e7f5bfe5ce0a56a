//! Delays between sequential tab opens during a layout apply.

use rand::Rng;
use std::time::Duration;

const MAX_DELAY_SECONDS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    base: Duration,
    jitter_ms: u64,
}

impl Pacing {
    /// `delay_seconds` is clamped to `0..=30`. A zero base disables jitter
    /// too.
    pub fn new(delay_seconds: f64, jitter_ms: u64) -> Self {
        let seconds = if delay_seconds.is_finite() {
            delay_seconds.clamp(0.0, MAX_DELAY_SECONDS)
        } else {
            0.0
        };
        Self {
            base: Duration::from_secs_f64(seconds),
            jitter_ms,
        }
    }

    pub fn none() -> Self {
        Self::new(0.0, 0)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Base plus a random jitter in `[0, jitter_ms)`.
    pub fn next_delay(&self) -> Duration {
        if self.base.is_zero() {
            return Duration::ZERO;
        }
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        } else {
            0
        };
        self.base + Duration::from_millis(jitter)
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
