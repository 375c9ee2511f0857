//! Export pacing constants

use std::time::Duration;

/// Cap on the throttle multiplier applied to the base governor delay.
/// With the default 500ms base this bounds a single pause at 5 seconds.
pub const MAX_THROTTLE_MULTIPLIER: u32 = 10;

/// Calculate the pause that follows `consecutive_throttles` throttled calls.
///
/// Zero throttles returns the base delay unchanged; each further throttle
/// doubles it, capped at `base * MAX_THROTTLE_MULTIPLIER`.
pub fn calculate_throttled_delay(base: Duration, consecutive_throttles: u32) -> Duration {
    if consecutive_throttles == 0 {
        return base;
    }
    let multiplier = 2u32
        .saturating_pow(consecutive_throttles)
        .min(MAX_THROTTLE_MULTIPLIER);
    base.saturating_mul(multiplier)
}
