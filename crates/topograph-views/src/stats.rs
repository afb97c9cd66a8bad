//! Per-category counters
//!
//! A full batch resets the totals and counts every counter up from zero. An
//! incremental batch adds to the totals and animates only the counters that
//! changed, from the value currently shown.

use crate::transition::{format_count, TransitionSlot};
use std::collections::BTreeMap;
use std::time::Duration;
use topograph_core::{CategoryCode, CategoryLabel, CategoryNames, CategoryTotals, Record};
use topograph_playback::UpdateSink;

/// One rendered counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub code: CategoryCode,
    /// Display name, or `None` when the name table has no entry for `code`
    pub name: Option<String>,
    /// Final value
    pub total: u64,
    /// Value shown at the current frame
    pub displayed: u64,
    /// `displayed` with thousands separators
    pub text: String,
}

/// Aggregate counters view
#[derive(Debug, Clone)]
pub struct StatsView {
    names: CategoryNames,
    animation: Duration,
    totals: CategoryTotals,
    counters: BTreeMap<CategoryCode, TransitionSlot>,
}

impl StatsView {
    pub fn new(names: CategoryNames, animation: Duration) -> Self {
        Self {
            names,
            animation,
            totals: CategoryTotals::new(),
            counters: BTreeMap::new(),
        }
    }

    pub fn totals(&self) -> &CategoryTotals {
        &self.totals
    }

    /// Advance every counter to frame time `now`
    pub fn frame(&mut self, now: Duration) {
        for slot in self.counters.values_mut() {
            slot.frame(now);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.counters.values().any(TransitionSlot::is_animating)
    }

    /// Counters ascending by category code
    pub fn items(&self) -> Vec<StatItem> {
        self.totals
            .iter()
            .map(|(code, total)| {
                let displayed = self
                    .counters
                    .get(&code)
                    .map(|slot| slot.value().floor() as u64)
                    .unwrap_or(total);
                let name = match self.names.label(code) {
                    CategoryLabel::Named(name) => Some(name.to_string()),
                    CategoryLabel::Unnamed(_) => None,
                };
                StatItem {
                    code,
                    name,
                    total,
                    displayed,
                    text: format_count(displayed),
                }
            })
            .collect()
    }

    /// Display label for a counter, the raw code when unnamed
    pub fn label(&self, code: CategoryCode) -> String {
        self.names.label(code).to_string()
    }
}

impl UpdateSink for StatsView {
    fn replace(&mut self, records: &[&Record]) {
        self.totals = CategoryTotals::from_records(records.iter().copied());
        self.counters.clear();
        for (code, total) in self.totals.iter() {
            let mut slot = TransitionSlot::new(0.0);
            slot.start_from(0.0, total as f64, self.animation);
            self.counters.insert(code, slot);
        }
    }

    fn append(&mut self, records: &[&Record]) {
        let before = self.totals.clone();
        self.totals.add_records(records.iter().copied());

        for (code, total) in self.totals.iter() {
            if before.get(code) == Some(total) {
                continue;
            }
            self.counters
                .entry(code)
                .or_default()
                .start(total as f64, self.animation);
        }
    }
}
