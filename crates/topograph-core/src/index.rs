//! Per-day event index
//!
//! The index is built once from the complete record set and never mutated
//! afterwards. Buckets are kept in ascending day order, so every query is a
//! read over a sorted map:
//!
//! ```text
//! 2023-01-01 → [r0, r3]
//! 2023-01-03 → [r1]
//! 2023-01-05 → [r2, r4]
//! ```
//!
//! Within a bucket records keep their ingestion order.

use crate::{Day, Error, Record, Result};
use indexmap::IndexMap;

/// One day and the records that occurred on it (never empty)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayBucket<'a> {
    pub day: Day,
    pub records: &'a [Record],
}

/// Read-only day → records mapping
#[derive(Debug, Clone, Default)]
pub struct EventIndex {
    /// Sorted by day after `build`
    buckets: IndexMap<Day, Vec<Record>>,
    record_count: usize,
}

impl EventIndex {
    /// Group records by calendar day
    ///
    /// An empty input produces a valid index with zero days.
    pub fn build(records: impl IntoIterator<Item = Record>) -> Self {
        let mut buckets: IndexMap<Day, Vec<Record>> = IndexMap::new();
        let mut record_count = 0;

        for record in records {
            buckets.entry(record.day()).or_default().push(record);
            record_count += 1;
        }
        buckets.sort_keys();

        tracing::info!(days = buckets.len(), records = record_count, "event index built");

        Self {
            buckets,
            record_count,
        }
    }

    /// Like [`build`](Self::build), but an empty input is an error
    pub fn build_non_empty(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let index = Self::build(records);
        if index.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(index)
    }

    /// The `n` most recent days, ascending
    ///
    /// Returns every day when fewer than `n` exist; `n == 0` returns nothing.
    pub fn last_n_days(&self, n: usize) -> Vec<DayBucket<'_>> {
        let start = self.buckets.len().saturating_sub(n);
        self.buckets
            .iter()
            .skip(start)
            .map(|(day, records)| DayBucket {
                day: *day,
                records,
            })
            .collect()
    }

    /// Records of one day; empty when the day has no bucket
    pub fn records_on_day(&self, day: Day) -> &[Record] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every record on or before `day`, day-ascending, ingestion order within a day
    pub fn records_up_to_and_including(&self, day: Day) -> Vec<&Record> {
        self.buckets
            .iter()
            .take_while(|(key, _)| **key <= day)
            .flat_map(|(_, records)| records.iter())
            .collect()
    }

    /// All bucket keys in ascending order
    pub fn all_days_ascending(&self) -> Vec<Day> {
        self.buckets.keys().copied().collect()
    }

    /// Iterate over all buckets in ascending order
    pub fn buckets(&self) -> impl Iterator<Item = DayBucket<'_>> {
        self.buckets.iter().map(|(day, records)| DayBucket {
            day: *day,
            records,
        })
    }

    /// 0-based position of `day` among the ascending keys
    pub fn ordinal_of(&self, day: Day) -> Option<usize> {
        self.buckets.get_index_of(&day)
    }

    /// The day at a 0-based position
    pub fn day_at(&self, ordinal: usize) -> Option<Day> {
        self.buckets.get_index(ordinal).map(|(day, _)| *day)
    }

    /// The chronologically next day that has records
    pub fn next_day_after(&self, day: Day) -> Option<Day> {
        self.buckets.keys().copied().find(|key| *key > day)
    }

    pub fn first_day(&self) -> Option<Day> {
        self.buckets.first().map(|(day, _)| *day)
    }

    pub fn last_day(&self) -> Option<Day> {
        self.buckets.last().map(|(day, _)| *day)
    }

    pub fn contains_day(&self, day: Day) -> bool {
        self.buckets.contains_key(&day)
    }

    /// Number of days with at least one record
    pub fn day_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl FromIterator<Record> for EventIndex {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::build(iter)
    }
}
