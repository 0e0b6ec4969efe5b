//! Couples a `DispersionSimulator` to a `TickScheduler`.
//!
//! Starting performs one pass immediately and then schedules the rest at a
//! fixed period. Pausing or resetting cancels the live schedule, and a tick
//! whose schedule is no longer live is ignored.

use std::time::Duration;

use crate::render::ColorField;
use crate::scheduler::{CancelHandle, Tick, TickScheduler};
use crate::simulator::DispersionSimulator;

/// Default gap between passes.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(40);

pub struct SimulationDriver<S: TickScheduler> {
    sim: DispersionSimulator,
    scheduler: S,
    period: Duration,
    handle: Option<CancelHandle>,
}

impl<S: TickScheduler> SimulationDriver<S> {
    pub fn new(sim: DispersionSimulator, scheduler: S, period: Duration) -> Self {
        Self {
            sim,
            scheduler,
            period,
            handle: None,
        }
    }

    /// Start running. Returns `false` (and schedules nothing) if already
    /// running.
    pub fn start(&mut self) -> bool {
        if !self.sim.start() {
            return false;
        }
        self.sim.step();
        self.handle = Some(self.scheduler.schedule_repeating(self.period));
        tracing::debug!("simulation started, period {:?}", self.period);
        true
    }

    /// Stop running and cancel the schedule. The field is kept.
    pub fn pause(&mut self) -> bool {
        self.cancel_schedule();
        let paused = self.sim.pause();
        if paused {
            tracing::debug!("simulation paused after {} ticks", self.sim.ticks());
        }
        paused
    }

    /// Stop, cancel the schedule and zero the field.
    pub fn reset(&mut self) {
        self.cancel_schedule();
        self.sim.reset();
    }

    /// Handle a tick from the scheduler. Returns whether a pass happened.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        match &self.handle {
            Some(handle) if handle.accepts(tick) => self.sim.tick(),
            _ => false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn sim(&self) -> &DispersionSimulator {
        &self.sim
    }

    /// Mutable access for parameter changes mid-run.
    pub fn sim_mut(&mut self) -> &mut DispersionSimulator {
        &mut self.sim
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn render(&self) -> ColorField {
        self.sim.render()
    }

    fn cancel_schedule(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}
