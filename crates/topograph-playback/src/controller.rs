//! Playback controller
//!
//! Owns the day cursor and the auto-advance ticker, queries the event index
//! on every cursor move, and delivers the result to every registered sink.
//!
//! ```text
//!            render_initial           toggle_play
//!   Idle ─────────────────▶ Selected ─────────────▶ Advancing
//!                            ▲   │ select_day          │ tick: next day
//!                            │   └──────────┘          │ (incremental)
//!                            └─────────────────────────┘
//!                     pause / select_day / end of timeline
//! ```
//!
//! A direct selection delivers `records_up_to_and_including(day)` as a full
//! batch. An auto-advance tick delivers `records_on_day(next)` as an
//! incremental batch. The cursor is updated and its position reported before
//! any sink receives the batch.

use crate::sink::{DayRequest, Position, RequestOrigin, UpdateSink};
use crate::ticker::{Ticker, TimerId};
use crate::PlaybackConfig;
use std::time::Duration;
use topograph_core::{Day, EventIndex, Record};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No cursor yet (or no data)
    Idle,
    /// Cursor on a day, auto-advance off
    Selected,
    /// Cursor on a day, the ticker moves it forward
    Advancing,
}

impl PlaybackState {
    pub fn is_advancing(&self) -> bool {
        matches!(self, PlaybackState::Advancing)
    }
}

/// The selection cursor and its auto-advance loop
pub struct Controller<'a> {
    index: &'a EventIndex,
    /// Cached `index.all_days_ascending()`
    days: Vec<Day>,
    /// Ordinal into `days`
    cursor: Option<usize>,
    ticker: Ticker,
    sinks: Vec<Box<dyn UpdateSink + 'a>>,
}

impl<'a> Controller<'a> {
    /// Create a controller in the `Idle` state
    pub fn new(index: &'a EventIndex, config: &PlaybackConfig) -> Self {
        Self {
            index,
            days: index.all_days_ascending(),
            cursor: None,
            ticker: Ticker::new(config.interval()),
            sinks: Vec::new(),
        }
    }

    /// Register a sink
    ///
    /// A sink attached after the first selection is brought up to date with a
    /// full batch for the current day.
    pub fn attach(&mut self, mut sink: impl UpdateSink + 'a) {
        if let Some(position) = self.position() {
            sink.position_changed(&position);
            sink.playback_changed(self.state());
            let records = self.index.records_up_to_and_including(position.day);
            sink.replace(&records);
        }
        self.sinks.push(Box::new(sink));
    }

    /// Remove every sink; auto-advance is torn down with them
    pub fn detach_sinks(&mut self) -> Vec<Box<dyn UpdateSink + 'a>> {
        if self.ticker.stop().is_some() {
            tracing::debug!("auto-advance stopped: sinks detached");
        }
        std::mem::take(&mut self.sinks)
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn state(&self) -> PlaybackState {
        match self.cursor {
            None => PlaybackState::Idle,
            Some(_) if self.ticker.is_running() => PlaybackState::Advancing,
            Some(_) => PlaybackState::Selected,
        }
    }

    /// The selected day
    pub fn cursor(&self) -> Option<Day> {
        self.cursor.map(|ordinal| self.days[ordinal])
    }

    pub fn position(&self) -> Option<Position> {
        self.cursor.map(|ordinal| Position {
            ordinal,
            day: self.days[ordinal],
            day_count: self.days.len(),
        })
    }

    /// All indexed days, ascending (slider range)
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn index(&self) -> &'a EventIndex {
        self.index
    }

    /// Id of the running auto-advance timer
    pub fn timer_id(&self) -> Option<TimerId> {
        self.ticker.active_id()
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// First render: select the latest day
    ///
    /// With an empty timeline the controller stays `Idle` and queries nothing.
    /// Returns whether a selection happened.
    pub fn render_initial(&mut self) -> bool {
        if self.cursor.is_some() {
            return false;
        }
        match self.days.len().checked_sub(1) {
            Some(last) => self.select_ordinal(last),
            None => {
                tracing::info!("empty timeline, staying idle");
                false
            }
        }
    }

    /// Select a day directly (click or slider commit)
    ///
    /// Cancels auto-advance first. Re-selecting the current day, or a day
    /// without records, changes nothing. Returns whether the cursor moved.
    pub fn select_day(&mut self, day: Day) -> bool {
        match self.index.ordinal_of(day) {
            Some(ordinal) => self.select_ordinal(ordinal),
            None => {
                tracing::debug!(%day, "ignoring selection of unindexed day");
                false
            }
        }
    }

    /// Select by 0-based position among the indexed days
    pub fn select_ordinal(&mut self, ordinal: usize) -> bool {
        if ordinal >= self.days.len() {
            tracing::debug!(ordinal, days = self.days.len(), "ignoring out of range selection");
            return false;
        }

        let stopped = self.stop_advancing();

        if self.cursor == Some(ordinal) {
            if stopped {
                self.report_position();
            }
            return false;
        }

        self.move_cursor(ordinal, false);
        true
    }

    /// Start or pause auto-advance
    pub fn toggle_play(&mut self) -> PlaybackState {
        if self.state().is_advancing() {
            self.pause();
        } else {
            self.play();
        }
        self.state()
    }

    /// Start auto-advance
    ///
    /// From the last day the cursor first rewinds to the first day with a
    /// full batch. No-op while `Idle` or already advancing.
    pub fn play(&mut self) {
        let Some(current) = self.cursor else {
            tracing::debug!("play ignored while idle");
            return;
        };
        if self.ticker.is_running() {
            return;
        }

        if current + 1 == self.days.len() && current != 0 {
            self.move_cursor(0, false);
        }

        let id = self.ticker.start();
        tracing::debug!(timer = id.raw(), "auto-advance started");
        self.report_position();
    }

    /// Stop auto-advance, keeping the cursor
    pub fn pause(&mut self) {
        if self.stop_advancing() {
            self.report_position();
        }
    }

    /// Feed elapsed wall time; runs every tick that became due
    ///
    /// Returns the number of ticks processed. Ticks stop as soon as the
    /// timeline end is reached, whatever time remains.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.ticker.accumulate(elapsed);
        let mut fired = 0;
        while self.ticker.take_due() {
            self.step();
            fired += 1;
        }
        fired
    }

    /// Tick from an external scheduler; stale ids are ignored
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if !self.ticker.is_current(id) {
            tracing::debug!(timer = id.raw(), "dropping stale tick");
            return false;
        }
        self.step();
        true
    }

    /// Handle a "day requested" signal
    pub fn handle_request(&mut self, request: DayRequest) -> bool {
        match request.origin {
            RequestOrigin::UserClick => self.select_day(request.day),
            RequestOrigin::AutoAdvance => {
                let expected = self.next_ordinal().map(|ordinal| self.days[ordinal]);
                if self.state().is_advancing() && expected == Some(request.day) {
                    self.step()
                } else {
                    tracing::debug!(day = %request.day, "ignoring out of sequence advance request");
                    false
                }
            }
        }
    }

    /// Drain and handle the requests raised by every sink
    pub fn pump_requests(&mut self) -> usize {
        let requests: Vec<DayRequest> = self
            .sinks
            .iter_mut()
            .flat_map(|sink| sink.take_requests())
            .collect();
        let count = requests.len();
        for request in requests {
            self.handle_request(request);
        }
        count
    }

    /// One auto-advance step; at the end of the timeline playback stops
    fn step(&mut self) -> bool {
        if !self.ticker.is_running() {
            return false;
        }
        match self.next_ordinal() {
            Some(next) => {
                self.move_cursor(next, true);
                true
            }
            None => {
                self.ticker.stop();
                tracing::info!(day = ?self.cursor(), "auto-advance reached the last day");
                self.report_position();
                false
            }
        }
    }

    fn next_ordinal(&self) -> Option<usize> {
        self.cursor
            .map(|ordinal| ordinal + 1)
            .filter(|next| *next < self.days.len())
    }

    /// Stop the ticker; true if it was running
    fn stop_advancing(&mut self) -> bool {
        match self.ticker.stop() {
            Some(id) => {
                tracing::debug!(timer = id.raw(), "auto-advance stopped");
                true
            }
            None => false,
        }
    }

    fn move_cursor(&mut self, ordinal: usize, incremental: bool) {
        let day = self.days[ordinal];
        self.cursor = Some(ordinal);
        tracing::debug!(%day, ordinal, incremental, "cursor moved");

        // Sinks learn the new position before they get its records
        self.report_position();

        let records: Vec<&Record> = if incremental {
            self.index.records_on_day(day).iter().collect()
        } else {
            self.index.records_up_to_and_including(day)
        };
        for sink in &mut self.sinks {
            sink.receive(&records, incremental);
        }
    }

    fn report_position(&mut self) {
        let Some(position) = self.position() else {
            return;
        };
        let state = self.state();
        for sink in &mut self.sinks {
            sink.position_changed(&position);
            sink.playback_changed(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use topograph_core::day::parse_instant;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Batch { incremental: bool, sum: u64, len: usize },
        Position(usize, String),
        State(PlaybackState),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        requests: Vec<DayRequest>,
    }

    impl Recorder {
        fn batches(&self) -> Vec<(bool, u64)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Batch { incremental, sum, .. } => Some((*incremental, *sum)),
                    _ => None,
                })
                .collect()
        }

        fn positions(&self) -> Vec<usize> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Position(ordinal, _) => Some(*ordinal),
                    _ => None,
                })
                .collect()
        }

        fn last_state(&self) -> Option<PlaybackState> {
            self.events.iter().rev().find_map(|e| match e {
                Event::State(state) => Some(*state),
                _ => None,
            })
        }

        fn clear(&mut self) {
            self.events.clear();
        }
    }

    impl UpdateSink for Recorder {
        fn replace(&mut self, records: &[&Record]) {
            self.events.push(Event::Batch {
                incremental: false,
                sum: records.iter().map(|r| r.affected_sum()).sum(),
                len: records.len(),
            });
        }

        fn append(&mut self, records: &[&Record]) {
            self.events.push(Event::Batch {
                incremental: true,
                sum: records.iter().map(|r| r.affected_sum()).sum(),
                len: records.len(),
            });
        }

        fn position_changed(&mut self, position: &Position) {
            self.events.push(Event::Position(position.ordinal, position.label()));
        }

        fn playback_changed(&mut self, state: PlaybackState) {
            self.events.push(Event::State(state));
        }

        fn take_requests(&mut self) -> Vec<DayRequest> {
            std::mem::take(&mut self.requests)
        }
    }

    fn record(day: &str, sum: u64) -> Record {
        Record::new(parse_instant(day).unwrap(), vec![sum])
    }

    /// 2023-01-01 (sum 10), 2023-01-03 (sum 5), 2023-01-05 (sum 7)
    fn sample_index() -> EventIndex {
        EventIndex::build(vec![
            record("2023-01-01", 6),
            record("2023-01-01", 4),
            record("2023-01-03", 5),
            record("2023-01-05", 7),
        ])
    }

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn setup(index: &EventIndex) -> (Controller<'_>, Rc<RefCell<Recorder>>) {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut controller = Controller::new(index, &PlaybackConfig::default());
        controller.attach(Rc::clone(&recorder));
        (controller, recorder)
    }

    const TICK: Duration = Duration::from_millis(1000);

    #[test]
    fn test_initial_render_selects_last_day() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        assert_eq!(controller.state(), PlaybackState::Idle);

        assert!(controller.render_initial());
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(controller.cursor(), Some(day("2023-01-05")));
        assert_eq!(recorder.borrow().batches(), [(false, 22)]);
        assert_eq!(recorder.borrow().positions(), [2]);

        // Only once
        assert!(!controller.render_initial());
    }

    #[test]
    fn test_empty_timeline_stays_idle() {
        let index = EventIndex::build(Vec::new());
        let (mut controller, recorder) = setup(&index);

        assert!(!controller.render_initial());
        assert_eq!(controller.toggle_play(), PlaybackState::Idle);
        assert!(!controller.select_ordinal(0));
        assert_eq!(controller.advance(TICK * 5), 0);
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(recorder.borrow().events.is_empty());
    }

    #[test]
    fn test_direct_selection_is_full_batch() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        recorder.borrow_mut().clear();

        assert!(controller.select_day(day("2023-01-03")));
        assert_eq!(recorder.borrow().batches(), [(false, 15)]);
        assert_eq!(
            recorder.borrow().events[0],
            Event::Position(1, "2023-01-03".to_string())
        );
    }

    #[test]
    fn test_reselecting_current_day_is_noop() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        recorder.borrow_mut().clear();

        assert!(!controller.select_day(day("2023-01-05")));
        assert!(!controller.select_day(day("2023-01-04")));
        assert!(recorder.borrow().events.is_empty());
    }

    #[test]
    fn test_playback_scenario() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        recorder.borrow_mut().clear();

        // From the last day, play rewinds to the first day
        assert_eq!(controller.toggle_play(), PlaybackState::Advancing);
        assert_eq!(controller.cursor(), Some(day("2023-01-01")));
        assert_eq!(recorder.borrow().batches(), [(false, 10)]);

        assert_eq!(controller.advance(TICK), 1);
        assert_eq!(controller.cursor(), Some(day("2023-01-03")));

        assert_eq!(controller.advance(TICK), 1);
        assert_eq!(controller.cursor(), Some(day("2023-01-05")));
        assert!(controller.state().is_advancing());

        // Third tick finds no next day and stops
        assert_eq!(controller.advance(TICK), 1);
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(controller.cursor(), Some(day("2023-01-05")));

        assert_eq!(controller.advance(TICK * 10), 0);
        assert_eq!(
            recorder.borrow().batches(),
            [(false, 10), (true, 5), (true, 7)]
        );
        assert_eq!(recorder.borrow().positions(), [0, 0, 1, 2, 2]);
        assert_eq!(recorder.borrow().last_state(), Some(PlaybackState::Selected));
    }

    #[test]
    fn test_large_elapsed_stops_at_end() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();

        // Two moves and the terminating tick, nothing beyond
        assert_eq!(controller.advance(TICK * 10), 3);
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(recorder.borrow().batches().len(), 4);
    }

    #[test]
    fn test_play_from_middle_does_not_rewind() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.select_day(day("2023-01-03"));
        recorder.borrow_mut().clear();

        controller.play();
        assert_eq!(controller.cursor(), Some(day("2023-01-03")));
        assert!(recorder.borrow().batches().is_empty());

        controller.advance(TICK);
        assert_eq!(recorder.borrow().batches(), [(true, 7)]);
    }

    #[test]
    fn test_incremental_batches_partition_cumulative() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.select_day(day("2023-01-01"));
        recorder.borrow_mut().clear();

        controller.play();
        controller.advance(TICK * 2);

        let delta: usize = recorder
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Batch { incremental: true, len, .. } => Some(*len),
                _ => None,
            })
            .sum();
        let full = index.records_up_to_and_including(day("2023-01-05")).len();
        let base = index.records_up_to_and_including(day("2023-01-01")).len();
        assert_eq!(delta, full - base);
    }

    #[test]
    fn test_manual_selection_cancels_advance() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();
        let stale = controller.timer_id().unwrap();
        recorder.borrow_mut().clear();

        assert!(controller.select_day(day("2023-01-03")));
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(controller.timer_id(), None);

        // An already scheduled tick must not fire
        assert!(!controller.on_timer(stale));
        assert_eq!(controller.advance(TICK * 3), 0);
        assert_eq!(recorder.borrow().batches(), [(false, 15)]);
    }

    #[test]
    fn test_reselect_while_advancing_only_stops() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();
        recorder.borrow_mut().clear();

        assert!(!controller.select_day(day("2023-01-01")));
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert!(recorder.borrow().batches().is_empty());
        assert_eq!(recorder.borrow().last_state(), Some(PlaybackState::Selected));
    }

    #[test]
    fn test_toggle_pause_and_resume() {
        let index = sample_index();
        let (mut controller, _recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();
        controller.advance(TICK);

        assert_eq!(controller.toggle_play(), PlaybackState::Selected);
        assert_eq!(controller.advance(TICK * 5), 0);
        assert_eq!(controller.cursor(), Some(day("2023-01-03")));

        assert_eq!(controller.toggle_play(), PlaybackState::Advancing);
        assert_eq!(controller.cursor(), Some(day("2023-01-03")));
    }

    #[test]
    fn test_external_timer_ticks() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();
        let id = controller.timer_id().unwrap();

        assert!(controller.on_timer(id));
        assert!(controller.on_timer(id));
        assert!(controller.on_timer(id));
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert!(!controller.on_timer(id));
        assert_eq!(recorder.borrow().batches().len(), 4);
    }

    #[test]
    fn test_single_day_playback() {
        let index = EventIndex::build(vec![record("2023-01-01", 3)]);
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();

        controller.toggle_play();
        assert_eq!(controller.advance(TICK), 1);
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(recorder.borrow().batches(), [(false, 3)]);
    }

    #[test]
    fn test_sink_requests() {
        let index = sample_index();
        let (mut controller, recorder) = setup(&index);
        controller.render_initial();

        recorder
            .borrow_mut()
            .requests
            .push(DayRequest::click(day("2023-01-01")));
        assert_eq!(controller.pump_requests(), 1);
        assert_eq!(controller.cursor(), Some(day("2023-01-01")));

        // Advance requests only count while advancing, for the next day
        let advance = DayRequest {
            day: day("2023-01-03"),
            origin: RequestOrigin::AutoAdvance,
        };
        assert!(!controller.handle_request(advance));
        controller.play();
        assert!(!controller.handle_request(DayRequest {
            day: day("2023-01-05"),
            origin: RequestOrigin::AutoAdvance,
        }));
        assert!(controller.handle_request(advance));
        assert_eq!(controller.cursor(), Some(day("2023-01-03")));
    }

    #[test]
    fn test_late_attach_catches_up() {
        let index = sample_index();
        let mut controller = Controller::new(&index, &PlaybackConfig::default());
        controller.render_initial();
        controller.select_day(day("2023-01-03"));

        let late = Rc::new(RefCell::new(Recorder::default()));
        controller.attach(Rc::clone(&late));
        assert_eq!(late.borrow().batches(), [(false, 15)]);
        assert_eq!(late.borrow().positions(), [1]);
    }

    #[test]
    fn test_detach_stops_advance() {
        let index = sample_index();
        let (mut controller, _recorder) = setup(&index);
        controller.render_initial();
        controller.toggle_play();

        let detached = controller.detach_sinks();
        assert_eq!(detached.len(), 1);
        assert_eq!(controller.sink_count(), 0);
        assert_eq!(controller.state(), PlaybackState::Selected);
        assert_eq!(controller.advance(TICK * 3), 0);
    }

    #[test]
    fn test_every_sink_sees_same_batch() {
        let index = sample_index();
        let (mut controller, first) = setup(&index);
        let second = Rc::new(RefCell::new(Recorder::default()));
        controller.attach(Rc::clone(&second));

        controller.render_initial();
        controller.toggle_play();
        controller.advance(TICK * 3);

        assert_eq!(first.borrow().events, second.borrow().events);
    }

    /// Remembers which day it believed current when each batch arrived
    #[derive(Default)]
    struct DayTracker {
        current: Option<Day>,
        seen: Vec<(Option<Day>, bool)>,
    }

    impl UpdateSink for DayTracker {
        fn replace(&mut self, _records: &[&Record]) {
            self.seen.push((self.current, false));
        }

        fn append(&mut self, _records: &[&Record]) {
            self.seen.push((self.current, true));
        }

        fn position_changed(&mut self, position: &Position) {
            self.current = Some(position.day);
        }
    }

    #[test]
    fn test_position_reported_before_batch() {
        let index = sample_index();
        let tracker = Rc::new(RefCell::new(DayTracker::default()));
        let mut controller = Controller::new(&index, &PlaybackConfig::default());
        controller.attach(Rc::clone(&tracker));

        controller.render_initial();
        controller.select_day(day("2023-01-03"));
        controller.play();
        controller.advance(TICK);

        assert_eq!(
            tracker.borrow().seen,
            [
                (Some(day("2023-01-05")), false),
                (Some(day("2023-01-03")), false),
                (Some(day("2023-01-05")), true),
            ]
        );

        // A late sink is positioned before its catch-up batch too
        let late = Rc::new(RefCell::new(DayTracker::default()));
        controller.attach(Rc::clone(&late));
        assert_eq!(late.borrow().seen, [(Some(day("2023-01-05")), false)]);
    }
}
