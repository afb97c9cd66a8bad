//! Value transitions for animated counters and progress
//!
//! A transition interpolates linearly from `from` to `to` over a fixed
//! duration of wall-clock time. Its clock starts on the first frame that
//! samples it, and it settles exactly on `to` once the duration has elapsed.
//!
//! A [`TransitionSlot`] holds at most one transition for a displayed scalar:
//! starting a new one replaces the running one, continuing from the value
//! currently shown.

use std::time::Duration;

/// One linear transition between two values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTransition {
    from: f64,
    to: f64,
    duration: Duration,
    /// Frame time of the first sample
    started: Option<Duration>,
}

impl ValueTransition {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            started: None,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Progress in `[0, 1]` at frame time `now`
    pub fn progress(&mut self, now: Duration) -> f64 {
        let started = *self.started.get_or_insert(now);
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value at frame time `now`
    pub fn sample(&mut self, now: Duration) -> f64 {
        let alpha = self.progress(now);
        if alpha >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * alpha
        }
    }

    /// Whether the last sample reached the end
    pub fn is_finished_at(&self, now: Duration) -> bool {
        match self.started {
            Some(started) => now.saturating_sub(started) >= self.duration,
            None => self.duration.is_zero(),
        }
    }
}

/// The displayed value of one scalar and its running transition
#[derive(Debug, Clone, Default)]
pub struct TransitionSlot {
    value: f64,
    active: Option<ValueTransition>,
    generation: u64,
}

impl TransitionSlot {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            active: None,
            generation: 0,
        }
    }

    /// Animate from the displayed value to `to`, replacing any running transition
    pub fn start(&mut self, to: f64, duration: Duration) -> u64 {
        self.start_from(self.value, to, duration)
    }

    /// Animate from an explicit start value, replacing any running transition
    pub fn start_from(&mut self, from: f64, to: f64, duration: Duration) -> u64 {
        self.value = from;
        self.active = Some(ValueTransition::new(from, to, duration));
        self.generation += 1;
        self.generation
    }

    /// Advance to frame time `now` and return the displayed value
    pub fn frame(&mut self, now: Duration) -> f64 {
        if let Some(transition) = self.active.as_mut() {
            self.value = transition.sample(now);
            if transition.is_finished_at(now) {
                self.active = None;
            }
        }
        self.value
    }

    /// Jump to the end of the running transition
    pub fn settle(&mut self) -> f64 {
        if let Some(transition) = self.active.take() {
            self.value = transition.target();
        }
        self.value
    }

    /// The displayed value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value the slot is heading to
    pub fn target(&self) -> f64 {
        self.active.map(|t| t.target()).unwrap_or(self.value)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the most recent transition
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Format a counter with a space as thousands separator (`1 234 567`)
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
