//! Topograph Playback - Day cursor with timed auto-advance
//!
//! The [`Controller`] moves a cursor across the days of an
//! [`EventIndex`](topograph_core::EventIndex), either by direct selection or
//! by a repeating timer, and decides per move whether sinks get a full
//! replacement batch or an incremental delta.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use topograph_core::{load_records_str, EventIndex, LoadOptions, Record};
//! use topograph_playback::{Controller, PlaybackConfig, PlaybackState, UpdateSink};
//!
//! #[derive(Default)]
//! struct Counter(usize);
//!
//! impl UpdateSink for Counter {
//!     fn replace(&mut self, records: &[&Record]) {
//!         self.0 = records.len();
//!     }
//!     fn append(&mut self, records: &[&Record]) {
//!         self.0 += records.len();
//!     }
//! }
//!
//! let json = r#"[{ "from": "2023-01-01" }, { "from": "2023-01-02" }]"#;
//! let index = EventIndex::build(load_records_str(json, &LoadOptions::default()).unwrap().records);
//!
//! let mut controller = Controller::new(&index, &PlaybackConfig::default());
//! controller.attach(Counter::default());
//! controller.render_initial();
//! controller.toggle_play();
//! controller.advance(Duration::from_secs(5));
//! assert_eq!(controller.state(), PlaybackState::Selected);
//! ```

pub mod config;
mod controller;
mod error;
mod sink;
mod ticker;

pub use config::PlaybackConfig;
pub use controller::{Controller, PlaybackState};
pub use error::{Error, Result};
pub use sink::{DayRequest, Position, RequestOrigin, UpdateSink};
pub use ticker::{Ticker, TimerId};
