//! Repeating tick schedules with cancel handles.
//!
//! A `TickScheduler` starts a repeating schedule and hands back a
//! `CancelHandle`. Every tick carries the generation of the schedule that
//! produced it, so a consumer can drop ticks that were already in flight
//! when their schedule was cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

/// One firing of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Stops a schedule. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether `tick` belongs to this schedule and the schedule is live.
    pub fn accepts(&self, tick: Tick) -> bool {
        tick.generation == self.generation && !self.is_cancelled()
    }
}

/// Source of repeating ticks.
pub trait TickScheduler {
    /// Begin firing every `period` until the returned handle is cancelled.
    fn schedule_repeating(&mut self, period: Duration) -> CancelHandle;
}

/// Scheduler driven by hand, for tests and headless stepping.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    generation: u64,
    active: Option<CancelHandle>,
    period: Option<Duration>,
    scheduled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next tick of the live schedule, if there is one.
    pub fn fire(&self) -> Option<Tick> {
        self.active
            .as_ref()
            .filter(|h| !h.is_cancelled())
            .map(|h| Tick {
                generation: h.generation(),
            })
    }

    /// Whether a schedule is live.
    pub fn is_active(&self) -> bool {
        self.fire().is_some()
    }

    /// Number of schedules started so far.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    /// Period of the most recent schedule.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> CancelHandle {
        self.generation += 1;
        self.scheduled += 1;
        let handle = CancelHandle::new(self.generation);
        self.active = Some(handle.clone());
        self.period = Some(period);
        handle
    }
}

/// Scheduler backed by `tokio::time::interval`. Ticks arrive through
/// `next_tick`. Must be used from inside a tokio runtime.
pub struct TokioScheduler {
    generation: u64,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 0,
            tx,
            rx,
        }
    }

    /// Wait for the next tick from any schedule.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for TokioScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> CancelHandle {
        self.generation += 1;
        let handle = CancelHandle::new(self.generation);
        let task_handle = handle.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if task_handle.is_cancelled() {
                    break;
                }
                let tick = Tick {
                    generation: task_handle.generation(),
                };
                if tx.send(tick).is_err() {
                    break;
                }
            }
            tracing::trace!("schedule {} stopped", task_handle.generation());
        });

        handle
    }
}
