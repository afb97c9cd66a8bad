//! Topograph Views - Headless view models for the incident timeline
//!
//! The three views react to the playback controller through the
//! [`UpdateSink`](topograph_playback::UpdateSink) contract and keep only
//! render-ready state; drawing is left to the host.
//!
//! - [`TimelineView`]: bars for the last N days, selection highlight,
//!   slider mirror, bar clicks as day requests
//! - [`MapView`]: projected incident dots, revealed in order per batch
//! - [`StatsView`]: per-category counters with animated values
//!
//! The animation building blocks are usable on their own:
//! [`ValueTransition`]/[`TransitionSlot`] for scalars, [`Projection`] for the
//! latitude/longitude → surface mapping and [`RevealSequence`] for
//! draw-in-order batches. All of them take frame time as a `Duration` from
//! an arbitrary origin.

mod map;
pub mod projection;
mod reveal;
mod stats;
mod timeline;
pub mod transition;

pub use map::MapView;
pub use projection::{GeoBounds, Point, Projection, Surface};
pub use reveal::RevealSequence;
pub use stats::{StatItem, StatsView};
pub use timeline::{Bar, SliderState, TimelineView, MIN_BAR_PERCENT};
pub use transition::{format_count, TransitionSlot, ValueTransition};
