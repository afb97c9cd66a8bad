//! Geographic scatter of incidents
//!
//! Keeps every located record it has been given, in `occurred_at` order.
//! Dots of earlier batches stay drawn; the current batch is revealed in order
//! over the animation duration. A full batch wipes the surface first.

use crate::projection::{GeoBounds, Point, Projection, Surface};
use crate::reveal::RevealSequence;
use chrono::{DateTime, Utc};
use std::time::Duration;
use topograph_core::Record;
use topograph_playback::UpdateSink;

/// The parts of a record the map needs
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mark {
    latitude: f64,
    longitude: f64,
    occurred_at: DateTime<Utc>,
}

/// Map view state
#[derive(Debug, Clone)]
pub struct MapView {
    projection: Projection,
    animation: Duration,
    marks: Vec<Mark>,
    /// `marks[batch_start..]` is the batch being revealed
    batch_start: usize,
    /// Dots of earlier batches, already on the surface
    settled: Vec<Point>,
    reveal: RevealSequence,
}

impl MapView {
    pub fn new(bounds: GeoBounds, surface: Surface, animation: Duration) -> Self {
        Self {
            projection: Projection::new(bounds, surface),
            animation,
            marks: Vec::new(),
            batch_start: 0,
            settled: Vec::new(),
            reveal: RevealSequence::new(Vec::new(), animation),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Number of located records held
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Resize the surface
    ///
    /// Every point is projected again; earlier batches are redrawn at once and
    /// the current batch reveal restarts from its first dot.
    pub fn resize(&mut self, surface: Surface) {
        self.projection.resize(surface);
        self.settled = self.project(&self.marks[..self.batch_start]);
        let batch = self.project(&self.marks[self.batch_start..]);
        self.reveal.restart(batch);
        tracing::debug!(width = surface.width, height = surface.height, "map resized");
    }

    /// Advance the reveal; returns the dots that became visible
    pub fn frame(&mut self, now: Duration) -> &[Point] {
        self.reveal.frame(now)
    }

    /// Every dot currently on the surface
    pub fn drawn(&self) -> Vec<Point> {
        let mut drawn = self.settled.clone();
        drawn.extend_from_slice(self.reveal.revealed());
        drawn
    }

    /// Whether the current batch is still being revealed
    pub fn is_animating(&self) -> bool {
        !self.reveal.is_finished()
    }

    fn project(&self, marks: &[Mark]) -> Vec<Point> {
        marks
            .iter()
            .map(|mark| self.projection.project(mark.latitude, mark.longitude))
            .collect()
    }

    fn push_batch(&mut self, records: &[&Record]) {
        let mut batch: Vec<Mark> = records
            .iter()
            .filter_map(|record| {
                record.coordinates().map(|(latitude, longitude)| Mark {
                    latitude,
                    longitude,
                    occurred_at: record.occurred_at(),
                })
            })
            .collect();
        batch.sort_by_key(|mark| mark.occurred_at);

        self.batch_start = self.marks.len();
        self.marks.extend(batch);
        let points = self.project(&self.marks[self.batch_start..]);
        self.reveal = RevealSequence::new(points, self.animation);
    }
}

impl UpdateSink for MapView {
    fn replace(&mut self, records: &[&Record]) {
        self.marks.clear();
        self.settled.clear();
        self.push_batch(records);
    }

    fn append(&mut self, records: &[&Record]) {
        // Dots the previous reveal had not reached yet are drawn right away
        self.reveal.finish();
        self.settled.extend_from_slice(self.reveal.points());
        self.push_batch(records);
    }
}
