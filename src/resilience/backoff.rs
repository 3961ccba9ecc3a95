//! Exponential backoff without jitter.

use std::time::Duration;

/// Delay inserted after the failed attempt `attempt_index` (zero-based):
/// `base × 2^attempt_index`, saturating instead of overflowing.
pub fn backoff_delay(base: Duration, attempt_index: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}
