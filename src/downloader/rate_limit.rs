//! Fixed-delay rate governor
//!
//! Paces the sequential per-order event calls with a constant pause. The only
//! adaptive behavior is a bounded doubling after the remote side answers 429;
//! the first non-throttled call restores the base delay.

use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::config::calculate_throttled_delay;

/// Pause between successive detail fetches
#[derive(Debug, Clone)]
pub struct RateGovernor {
    base_delay: Duration,
    consecutive_throttles: u32,
}

impl RateGovernor {
    /// Governor pausing `base_delay` after every call
    pub fn fixed(base_delay: Duration) -> Self {
        Self {
            base_delay,
            consecutive_throttles: 0,
        }
    }

    /// Governor that never pauses
    pub fn disabled() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Configured base delay
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay the next [`pause`](Self::pause) will apply
    pub fn next_delay(&self) -> Duration {
        calculate_throttled_delay(self.base_delay, self.consecutive_throttles)
    }

    /// Record that the last call was throttled (HTTP 429)
    pub fn note_throttled(&mut self) {
        self.consecutive_throttles = self.consecutive_throttles.saturating_add(1);
        debug!(
            consecutive_throttles = self.consecutive_throttles,
            next_delay_ms = self.next_delay().as_millis() as u64,
            "Remote throttling observed"
        );
    }

    /// Record that the last call was not throttled
    pub fn note_success(&mut self) {
        self.consecutive_throttles = 0;
    }

    /// Sleep for the current delay
    ///
    /// # Returns
    /// The delay that was applied
    pub async fn pause(&self) -> Duration {
        let delay = self.next_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        delay
    }
}

impl Default for RateGovernor {
    fn default() -> Self {
        Self::fixed(crate::config::DEFAULT_DETAIL_DELAY)
    }
}
