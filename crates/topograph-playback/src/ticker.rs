//! Repeating auto-advance timer
//!
//! The ticker does not sleep or spawn anything. The host either feeds it
//! elapsed wall time (`accumulate` + `take_due`) or runs its own scheduler and
//! reports back with the [`TimerId`] it was given. Every `start` mints a new
//! id, and `stop` invalidates the current one, so a tick that was already
//! scheduled under an old id is recognised as stale and dropped.

use std::time::Duration;

/// Identity of one run of the ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Running {
    id: TimerId,
    /// Time accumulated since the last tick fired
    pending: Duration,
}

/// Fixed-interval repeating timer with cancellation
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    generation: u64,
    running: Option<Running>,
}

impl Ticker {
    /// Create a stopped ticker
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            generation: 0,
            running: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a new run, cancelling any current one
    pub fn start(&mut self) -> TimerId {
        self.generation += 1;
        let id = TimerId(self.generation);
        self.running = Some(Running {
            id,
            pending: Duration::ZERO,
        });
        id
    }

    /// Cancel the current run; returns its id if one was running
    pub fn stop(&mut self) -> Option<TimerId> {
        self.running.take().map(|running| running.id)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Id of the current run
    pub fn active_id(&self) -> Option<TimerId> {
        self.running.map(|running| running.id)
    }

    /// Whether `id` belongs to the current run
    pub fn is_current(&self, id: TimerId) -> bool {
        self.active_id() == Some(id)
    }

    /// Add elapsed wall time; ignored while stopped
    pub fn accumulate(&mut self, elapsed: Duration) {
        if let Some(running) = self.running.as_mut() {
            running.pending += elapsed;
        }
    }

    /// Consume one interval if a tick is due
    ///
    /// Call repeatedly until it returns `false`; if the run is stopped in
    /// between, the remaining time is discarded with it.
    pub fn take_due(&mut self) -> bool {
        let interval = self.interval;
        match self.running.as_mut() {
            Some(running) if running.pending >= interval => {
                running.pending -= interval;
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, `None` while stopped
    pub fn until_next(&self) -> Option<Duration> {
        self.running
            .map(|running| self.interval.saturating_sub(running.pending))
    }
}
