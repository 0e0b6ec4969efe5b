//! Pass threshold and lenient parsing of user-entered quiz settings.
//!
//! User input never fails a session start: unparseable values fall back to
//! the documented defaults and out-of-range values are clamped.

use serde::{Deserialize, Serialize};

use crate::engine::percent;

/// Question count used when the entered value cannot be parsed.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Minimum score, as a fraction in `[0, 1]`, required to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassThreshold(f64);

impl PassThreshold {
    pub const DEFAULT: PassThreshold = PassThreshold(0.70);

    /// Threshold from a fraction, clamped to `[0, 1]`. NaN yields the default.
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction.is_nan() {
            return Self::DEFAULT;
        }
        Self(fraction.clamp(0.0, 1.0))
    }

    pub fn from_percent(percent: f64) -> Self {
        Self::from_fraction(percent / 100.0)
    }

    /// Parse a percentage such as `"70"` or `"85.5"`. Anything unparseable
    /// gives `PassThreshold::DEFAULT`.
    pub fn parse_percent(input: &str) -> Self {
        match input.trim().trim_end_matches('%').trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Self::from_percent(value),
            _ => {
                tracing::warn!("invalid pass threshold {input:?}, using default");
                Self::DEFAULT
            }
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Threshold as a whole percentage, rounded down.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0 + 1e-9).floor() as u32
    }

    /// Whether `score` out of `total` passes. The score is first reduced to
    /// a whole percentage, so 69.9% does not pass a 70% threshold.
    pub fn is_pass(self, score: usize, total: usize) -> bool {
        f64::from(percent(score, total)) / 100.0 >= self.0 - 1e-9
    }
}

impl Default for PassThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parse a requested question count. Unparseable input gives
/// `DEFAULT_QUESTION_COUNT`; anything below 1 becomes 1.
pub fn parse_count(input: &str) -> usize {
    match input.trim().parse::<i64>() {
        Ok(n) => n.max(1) as usize,
        Err(_) => DEFAULT_QUESTION_COUNT,
    }
}
