//! Bar-chart timeline
//!
//! One bar per day of the `last_n_days` window, its height relative to the
//! busiest day in the window. The timeline does not consume record batches:
//! it follows the cursor through position reports, highlights the selected
//! bar, mirrors the slider and the play/pause affordance, and turns bar
//! clicks into day requests for the controller.

use topograph_core::{total_affected, Day, EventIndex, Record};
use topograph_playback::{DayRequest, PlaybackState, Position, UpdateSink};

/// Smallest bar height, in percent
pub const MIN_BAR_PERCENT: u8 = 5;

/// One day on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub day: Day,
    /// Sum of `affected_sum` over the day
    pub total: u64,
    /// Height relative to the busiest day, at least [`MIN_BAR_PERCENT`]
    pub height_percent: u8,
}

/// Slider mirror of the controller position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderState {
    pub value: usize,
    pub max: usize,
    pub label: String,
}

/// Timeline view state
#[derive(Debug, Clone)]
pub struct TimelineView {
    bars: Vec<Bar>,
    selected: Option<Day>,
    position: Option<Position>,
    state: PlaybackState,
    requests: Vec<DayRequest>,
}

impl TimelineView {
    /// Build the bars for the `window` most recent days
    pub fn new(index: &EventIndex, window: usize) -> Self {
        let buckets = index.last_n_days(window);
        let totals: Vec<(Day, u64)> = buckets
            .iter()
            .map(|bucket| (bucket.day, total_affected(bucket.records)))
            .collect();
        let max = totals.iter().map(|(_, total)| *total).max().unwrap_or(0);

        let bars = totals
            .into_iter()
            .map(|(day, total)| Bar {
                day,
                total,
                height_percent: bar_height(total, max),
            })
            .collect();

        Self {
            bars,
            selected: None,
            position: None,
            state: PlaybackState::Idle,
            requests: Vec::new(),
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The highlighted day
    pub fn selected(&self) -> Option<Day> {
        self.selected
    }

    /// Index of the highlighted bar, `None` if the day is outside the window
    pub fn selected_bar(&self) -> Option<usize> {
        let selected = self.selected?;
        self.bars.iter().position(|bar| bar.day == selected)
    }

    pub fn slider(&self) -> Option<SliderState> {
        self.position.map(|position| SliderState {
            value: position.ordinal,
            max: position.day_count.saturating_sub(1),
            label: position.label(),
        })
    }

    /// Whether the play/pause control shows "pause"
    pub fn is_playing(&self) -> bool {
        self.state.is_advancing()
    }

    /// Click on a bar by its index; queues a day request
    pub fn click(&mut self, bar: usize) -> bool {
        match self.bars.get(bar) {
            Some(bar) => {
                self.requests.push(DayRequest::click(bar.day));
                true
            }
            None => false,
        }
    }
}

/// `max(round(total / max × 100), 5)`
fn bar_height(total: u64, max: u64) -> u8 {
    if max == 0 {
        return MIN_BAR_PERCENT;
    }
    let percent = (total as f64 / max as f64 * 100.0).round() as u8;
    percent.max(MIN_BAR_PERCENT)
}

impl UpdateSink for TimelineView {
    fn replace(&mut self, _records: &[&Record]) {}

    fn append(&mut self, _records: &[&Record]) {}

    fn position_changed(&mut self, position: &Position) {
        self.selected = Some(position.day);
        self.position = Some(*position);
    }

    fn playback_changed(&mut self, state: PlaybackState) {
        self.state = state;
    }

    fn take_requests(&mut self) -> Vec<DayRequest> {
        std::mem::take(&mut self.requests)
    }
}
