//! Time unit normalization for calibration data.
//!
//! Device documents report durations in seconds; backend properties carry
//! milliseconds.

/// Unit label attached to converted durations.
pub const MILLISECONDS: &str = "ms";

/// Convert seconds to milliseconds.
#[inline]
pub fn seconds_to_ms(seconds: f64) -> f64 {
    seconds * 1000.0
}
