//! Grid-based concentration model.
//!
//! Each tick applies, in order: injection at the leak cell, upward
//! advection (buoyancy), 5-point diffusion on interior cells, removal at the
//! ceiling vent, and clipping to `[0, MAX_CONCENTRATION]`. Every stage reads
//! the previous stage's output.

use std::ops::Range;

use crate::grid::ConcentrationGrid;
use crate::params::DispersionParams;
use crate::render::{render_field, ColorField};

/// Upper clip bound for every cell.
pub const MAX_CONCENTRATION: f64 = 5.0;
/// Mass injected per tick per unit of leak rate.
pub const INJECTION_PER_LEAK: f64 = 0.5;
/// Fraction removed at the vent per unit of vent strength.
pub const VENT_REMOVAL_PER_STRENGTH: f64 = 0.6;

/// Geometry of the room: grid size, where the leak is, where the vent is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLayout {
    pub nx: usize,
    pub ny: usize,
    /// `(column, row)` of the leak source.
    pub leak_cell: (usize, usize),
    /// Top-row columns subject to ventilation.
    pub vent_span: Range<usize>,
}

impl RoomLayout {
    pub const DEFAULT_NX: usize = 70;
    pub const DEFAULT_NY: usize = 35;

    /// Layout for an `nx × ny` room (at least 3 × 4). The leak sits near the
    /// floor at the left wall; the vent spans the middle of the ceiling.
    pub fn with_size(nx: usize, ny: usize) -> Self {
        let nx = nx.max(3);
        let ny = ny.max(4);
        let vent_span = if nx > 40 { 20..nx - 20 } else { nx / 4..nx - nx / 4 };
        Self {
            nx,
            ny,
            leak_cell: ((nx - 1).min(6), ny - 4),
            vent_span,
        }
    }
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self::with_size(Self::DEFAULT_NX, Self::DEFAULT_NY)
    }
}

/// Whether the model is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Stopped,
    Running,
}

/// The dispersion model: field, scratch buffer, parameters and run state.
#[derive(Debug, Clone)]
pub struct DispersionSimulator {
    layout: RoomLayout,
    params: DispersionParams,
    field: ConcentrationGrid,
    scratch: ConcentrationGrid,
    state: SimState,
    ticks: u64,
}

impl DispersionSimulator {
    pub fn new(layout: RoomLayout, params: DispersionParams) -> Self {
        let field = ConcentrationGrid::new(layout.nx, layout.ny);
        let scratch = field.clone();
        Self {
            layout,
            params: params.clamped(),
            field,
            scratch,
            state: SimState::Stopped,
            ticks: 0,
        }
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    pub fn params(&self) -> DispersionParams {
        self.params
    }

    /// Replace the parameters. Takes effect on the next tick.
    pub fn set_params(&mut self, params: DispersionParams) {
        self.params = params.clamped();
    }

    pub fn field(&self) -> &ConcentrationGrid {
        &self.field
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Number of update passes since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Enter `Running`. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SimState::Running;
        true
    }

    /// Enter `Stopped` without touching the field. Returns `false` if
    /// already stopped.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SimState::Stopped;
        true
    }

    /// Stop and zero the field.
    pub fn reset(&mut self) {
        self.state = SimState::Stopped;
        self.field.clear();
        self.scratch.clear();
        self.ticks = 0;
    }

    /// Advance one pass if running. Returns whether a pass happened.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.step();
        true
    }

    /// One full update pass, regardless of run state.
    pub fn step(&mut self) {
        let p = self.params;
        let (leak_col, leak_row) = self.layout.leak_cell;

        self.field.add(leak_row, leak_col, INJECTION_PER_LEAK * p.leak_rate);
        apply_buoyancy(&mut self.field, &mut self.scratch, p.buoyancy);
        apply_diffusion(&mut self.field, &mut self.scratch, p.diffusion);
        apply_ventilation(&mut self.field, self.layout.vent_span.clone(), p.vent_strength);
        clip(&mut self.field);

        self.ticks += 1;
        if self.ticks % 250 == 0 {
            tracing::debug!(
                "tick {}: total mass {:.3}, peak {:.3}",
                self.ticks,
                self.field.total(),
                self.field.max_value()
            );
        }
    }

    /// Colour grid for the current field.
    pub fn render(&self) -> ColorField {
        render_field(&self.field)
    }
}

/// Move `buoyancy × c` from every row but the top one to the row above.
/// A zero coefficient leaves the field untouched.
pub fn apply_buoyancy(field: &mut ConcentrationGrid, scratch: &mut ConcentrationGrid, buoyancy: f64) {
    if buoyancy <= 0.0 {
        return;
    }
    scratch.copy_from(field);
    for row in 1..field.ny() {
        for col in 0..field.nx() {
            let moved = buoyancy * field.get(row, col);
            scratch.add(row - 1, col, moved);
            scratch.add(row, col, -moved);
        }
    }
    for (dst, src) in field.cells_mut().iter_mut().zip(scratch.cells()) {
        *dst = src.max(0.0);
    }
}

/// 5-point stencil `(1 − 4d)·c + d·(neighbours)` on interior cells. The
/// outer ring is copied through unchanged.
pub fn apply_diffusion(field: &mut ConcentrationGrid, scratch: &mut ConcentrationGrid, d: f64) {
    if d <= 0.0 || field.nx() < 3 || field.ny() < 3 {
        return;
    }
    scratch.copy_from(field);
    for row in 1..field.ny() - 1 {
        for col in 1..field.nx() - 1 {
            let neighbours = field.get(row + 1, col)
                + field.get(row - 1, col)
                + field.get(row, col + 1)
                + field.get(row, col - 1);
            scratch.set(row, col, (1.0 - 4.0 * d) * field.get(row, col) + d * neighbours);
        }
    }
    for (dst, src) in field.cells_mut().iter_mut().zip(scratch.cells()) {
        *dst = src.max(0.0);
    }
}

/// Scale the top-row cells in `span` by `1 − 0.6·vent_strength`.
pub fn apply_ventilation(field: &mut ConcentrationGrid, span: Range<usize>, vent_strength: f64) {
    if vent_strength <= 0.0 {
        return;
    }
    let keep = 1.0 - VENT_REMOVAL_PER_STRENGTH * vent_strength;
    let end = span.end.min(field.nx());
    for col in span.start.min(end)..end {
        let value = field.get(0, col);
        field.set(0, col, value * keep);
    }
}

pub fn clip(field: &mut ConcentrationGrid) {
    for v in field.cells_mut() {
        *v = (*v).clamp(0.0, MAX_CONCENTRATION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_air() -> DispersionParams {
        DispersionParams {
            leak_rate: 0.0,
            vent_strength: 0.0,
            buoyancy: 0.0,
            diffusion: 0.0,
        }
    }

    #[test]
    fn default_layout_matches_room() {
        let layout = RoomLayout::default();
        assert_eq!((layout.nx, layout.ny), (70, 35));
        assert_eq!(layout.leak_cell, (6, 31));
        assert_eq!(layout.vent_span, 20..50);
    }

    #[test]
    fn small_layout_stays_in_bounds() {
        let layout = RoomLayout::with_size(1, 1);
        assert_eq!((layout.nx, layout.ny), (3, 4));
        assert!(layout.leak_cell.0 < layout.nx);
        assert!(layout.leak_cell.1 < layout.ny);
        assert!(layout.vent_span.end <= layout.nx);
    }

    #[test]
    fn injection_adds_half_leak_rate_at_source() {
        let params = DispersionParams {
            leak_rate: 1.0,
            ..still_air()
        };
        let mut sim = DispersionSimulator::new(RoomLayout::default(), params);
        sim.step();
        assert!((sim.field().get(31, 6) - 0.5).abs() < 1e-12);
        assert!((sim.field().total() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn buoyancy_moves_mass_up_one_row() {
        let mut field = ConcentrationGrid::new(5, 5);
        let mut scratch = field.clone();
        field.set(3, 2, 1.0);
        apply_buoyancy(&mut field, &mut scratch, 0.5);
        assert!((field.get(2, 2) - 0.5).abs() < 1e-12);
        assert!((field.get(3, 2) - 0.5).abs() < 1e-12);
        assert!((field.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn buoyancy_keeps_top_row_mass() {
        let mut field = ConcentrationGrid::new(4, 4);
        let mut scratch = field.clone();
        field.set(0, 1, 2.0);
        apply_buoyancy(&mut field, &mut scratch, 1.0);
        assert_eq!(field.get(0, 1), 2.0);
    }

    #[test]
    fn diffusion_spreads_to_neighbours() {
        let mut field = ConcentrationGrid::new(7, 7);
        let mut scratch = field.clone();
        field.set(3, 3, 1.0);
        apply_diffusion(&mut field, &mut scratch, 0.2);
        assert!((field.get(3, 3) - 0.2).abs() < 1e-12);
        for (r, c) in [(2, 3), (4, 3), (3, 2), (3, 4)] {
            assert!((field.get(r, c) - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn diffusion_conserves_interior_mass_away_from_walls() {
        let mut sim = DispersionSimulator::new(
            RoomLayout::default(),
            DispersionParams {
                diffusion: 0.2,
                ..still_air()
            },
        );
        sim.field.set(17, 35, 3.0);
        sim.field.set(15, 30, 1.0);
        let before = sim.field().interior_total();
        sim.step();
        let after = sim.field().interior_total();
        assert!((before - after).abs() < 1e-9, "{before} vs {after}");
    }

    #[test]
    fn diffusion_leaves_boundary_ring_untouched() {
        let mut field = ConcentrationGrid::new(6, 6);
        let mut scratch = field.clone();
        field.set(0, 3, 1.0);
        field.set(5, 0, 2.0);
        field.set(2, 5, 0.7);
        let before = field.clone();
        apply_diffusion(&mut field, &mut scratch, 0.25);
        for row in 0..6 {
            for col in 0..6 {
                if row == 0 || col == 0 || row == 5 || col == 5 {
                    assert_eq!(field.get(row, col), before.get(row, col));
                }
            }
        }
        // The interior neighbours pick up mass from the ring.
        assert!(field.get(1, 3) > 0.0);
    }

    #[test]
    fn strong_diffusion_never_goes_negative() {
        let mut field = ConcentrationGrid::new(5, 5);
        let mut scratch = field.clone();
        field.set(2, 2, 4.0);
        apply_diffusion(&mut field, &mut scratch, 0.6);
        assert!(field.cells().iter().all(|&v| v >= 0.0));
        assert_eq!(field.get(2, 2), 0.0);
    }

    #[test]
    fn ventilation_only_touches_vent_span_of_top_row() {
        let mut field = ConcentrationGrid::new(10, 3);
        for col in 0..10 {
            field.set(0, col, 1.0);
            field.set(1, col, 1.0);
        }
        apply_ventilation(&mut field, 3..6, 0.5);
        for col in 0..10 {
            let expected = if (3..6).contains(&col) { 0.7 } else { 1.0 };
            assert!((field.get(0, col) - expected).abs() < 1e-12);
            assert_eq!(field.get(1, col), 1.0);
        }
    }

    #[test]
    fn every_cell_clipped_after_any_tick() {
        let params = DispersionParams {
            leak_rate: 2.0,
            vent_strength: 0.0,
            buoyancy: 1.0,
            diffusion: 0.6,
        };
        let mut sim = DispersionSimulator::new(RoomLayout::default(), params);
        for _ in 0..400 {
            sim.step();
            assert!(sim
                .field()
                .cells()
                .iter()
                .all(|&v| (0.0..=MAX_CONCENTRATION).contains(&v)));
        }
        assert!(sim.field().max_value() > 0.0);
    }

    #[test]
    fn gas_rises_toward_the_ceiling() {
        let mut sim = DispersionSimulator::new(RoomLayout::default(), DispersionParams::default());
        for _ in 0..200 {
            sim.step();
        }
        let top: f64 = sim.field().rows().take(5).flatten().sum();
        let bottom: f64 = sim.field().rows().skip(30).flatten().sum();
        assert!(top > bottom, "top {top} should exceed bottom {bottom}");
    }

    #[test]
    fn start_pause_reset_state_machine() {
        let mut sim = DispersionSimulator::new(RoomLayout::default(), DispersionParams::default());
        assert_eq!(sim.state(), SimState::Stopped);
        assert!(!sim.tick(), "stopped simulators do not tick");
        assert!(!sim.pause(), "pause while stopped is a no-op");

        assert!(sim.start());
        assert!(!sim.start(), "start while running is a no-op");
        assert!(sim.tick());
        assert!(sim.tick());
        assert_eq!(sim.ticks(), 2);

        assert!(sim.pause());
        let frozen = sim.field().clone();
        assert!(!sim.tick());
        assert_eq!(sim.field(), &frozen, "pause keeps the field");

        sim.reset();
        assert_eq!(sim.state(), SimState::Stopped);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.field().total(), 0.0);
    }

    #[test]
    fn set_params_clamps() {
        let mut sim = DispersionSimulator::new(RoomLayout::default(), DispersionParams::default());
        sim.set_params(DispersionParams {
            leak_rate: 10.0,
            ..DispersionParams::default()
        });
        assert_eq!(sim.params().leak_rate, 2.0);
    }
}
