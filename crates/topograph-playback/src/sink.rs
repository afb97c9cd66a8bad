//! Update sink contract
//!
//! Views (timeline, map, stats) implement [`UpdateSink`] and are registered
//! with the controller. For every cursor move each sink receives the same
//! record set, either as a full replacement or as a delta to merge.

use crate::controller::PlaybackState;
use std::cell::RefCell;
use std::rc::Rc;
use topograph_core::{Day, Record};

/// Where the cursor is among the indexed days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 0-based position in `all_days_ascending`
    pub ordinal: usize,
    pub day: Day,
    /// Number of indexed days (slider bound)
    pub day_count: usize,
}

impl Position {
    /// Human readable day, for the slider label
    pub fn label(&self) -> String {
        self.day.to_string()
    }

    pub fn is_last(&self) -> bool {
        self.ordinal + 1 == self.day_count
    }
}

/// Who asked for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Direct interaction, e.g. a clicked timeline bar
    UserClick,
    /// Raised on behalf of the auto-advance loop
    AutoAdvance,
}

/// "Day requested" signal raised by a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRequest {
    pub day: Day,
    pub origin: RequestOrigin,
}

impl DayRequest {
    pub fn click(day: Day) -> Self {
        Self {
            day,
            origin: RequestOrigin::UserClick,
        }
    }
}

/// A consumer of update batches
pub trait UpdateSink {
    /// Drop prior state and render from this complete set
    fn replace(&mut self, records: &[&Record]);

    /// Merge a delta into prior state
    fn append(&mut self, records: &[&Record]);

    /// Cursor position after a transition
    fn position_changed(&mut self, _position: &Position) {}

    /// Play/pause affordance
    fn playback_changed(&mut self, _state: PlaybackState) {}

    /// Day requests raised since the last call
    fn take_requests(&mut self) -> Vec<DayRequest> {
        Vec::new()
    }

    /// Dispatch one batch
    fn receive(&mut self, records: &[&Record], incremental: bool) {
        if incremental {
            self.append(records);
        } else {
            self.replace(records);
        }
    }
}

/// Shared sink, for hosts that keep a handle to the view they register
impl<S: UpdateSink + ?Sized> UpdateSink for Rc<RefCell<S>> {
    fn replace(&mut self, records: &[&Record]) {
        self.borrow_mut().replace(records)
    }

    fn append(&mut self, records: &[&Record]) {
        self.borrow_mut().append(records)
    }

    fn position_changed(&mut self, position: &Position) {
        self.borrow_mut().position_changed(position)
    }

    fn playback_changed(&mut self, state: PlaybackState) {
        self.borrow_mut().playback_changed(state)
    }

    fn take_requests(&mut self) -> Vec<DayRequest> {
        self.borrow_mut().take_requests()
    }

    fn receive(&mut self, records: &[&Record], incremental: bool) {
        self.borrow_mut().receive(records, incremental)
    }
}
