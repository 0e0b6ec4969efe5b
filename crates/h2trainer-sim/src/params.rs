//! Tunable model parameters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const LEAK_RATE_RANGE: RangeInclusive<f64> = 0.0..=2.0;
pub const VENT_STRENGTH_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const BUOYANCY_RANGE: RangeInclusive<f64> = 0.0..=1.0;
pub const DIFFUSION_RANGE: RangeInclusive<f64> = 0.0..=0.6;

/// The four user-tunable knobs of the dispersion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionParams {
    /// Mass injected per tick is `0.5 × leak_rate`.
    pub leak_rate: f64,
    /// Fraction of ceiling-vent mass removed per tick is `0.6 × vent_strength`.
    pub vent_strength: f64,
    /// Fraction of each cell moved one row up per tick.
    pub buoyancy: f64,
    /// Neighbour weight of the 5-point mixing stencil.
    pub diffusion: f64,
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self {
            leak_rate: 0.8,
            vent_strength: 0.6,
            buoyancy: 0.45,
            diffusion: 0.20,
        }
    }
}

impl DispersionParams {
    /// Every knob forced into its slider range. NaN becomes the range start.
    pub fn clamped(self) -> Self {
        Self {
            leak_rate: clamp_to(self.leak_rate, &LEAK_RATE_RANGE),
            vent_strength: clamp_to(self.vent_strength, &VENT_STRENGTH_RANGE),
            buoyancy: clamp_to(self.buoyancy, &BUOYANCY_RANGE),
            diffusion: clamp_to(self.diffusion, &DIFFUSION_RANGE),
        }
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}
