//! Colour ramp for the concentration field.
//!
//! Pure functions of the field: low concentrations map to a pale, cool tone
//! and high concentrations to a saturated, warm one.

use std::fmt;

use crate::grid::ConcentrationGrid;

/// Concentration that maps to the top of the ramp.
pub const REFERENCE_MAX: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Concentration scaled into `[0, 1]` against `REFERENCE_MAX`.
pub fn normalize(value: f64) -> f64 {
    (value / REFERENCE_MAX).clamp(0.0, 1.0)
}

/// Interpolated colour for a normalised level in `[0, 1]`.
pub fn ramp_color(level: f64) -> Rgb {
    let v = level.clamp(0.0, 1.0);
    Rgb {
        r: (255.0 * (1.0 - 0.9 * v)) as u8,
        g: (255.0 * (0.9 - 0.6 * v)) as u8,
        b: (255.0 * (0.3 + 0.7 * v)) as u8,
    }
}

/// Per-cell normalised levels and colours, same shape as the source field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorField {
    nx: usize,
    ny: usize,
    levels: Vec<f64>,
    colors: Vec<Rgb>,
}

impl ColorField {
    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn level(&self, row: usize, col: usize) -> f64 {
        self.levels[row * self.nx + col]
    }

    pub fn color(&self, row: usize, col: usize) -> Rgb {
        self.colors[row * self.nx + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.colors.chunks(self.nx.max(1))
    }
}

/// Map every cell of `field` through `normalize` and `ramp_color`.
pub fn render_field(field: &ConcentrationGrid) -> ColorField {
    let levels: Vec<f64> = field.cells().iter().map(|&v| normalize(v)).collect();
    let colors = levels.iter().map(|&l| ramp_color(l)).collect();
    ColorField {
        nx: field.nx(),
        ny: field.ny(),
        levels,
        colors,
    }
}
