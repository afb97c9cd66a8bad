//! Aggregate counters over record sets

use crate::{CategoryCode, Record};
use std::collections::BTreeMap;

/// Sum of `affected_sum` over all records, saturating at `u64::MAX`
pub fn total_affected<'a>(records: impl IntoIterator<Item = &'a Record>) -> u64 {
    records
        .into_iter()
        .fold(0, |total, record| total.saturating_add(record.affected_sum()))
}

/// Per-category running totals
///
/// Uncategorized records are not counted and totals saturate at `u64::MAX`.
/// Iteration is ascending by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    totals: BTreeMap<CategoryCode, u64>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals of a record set
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut totals = Self::new();
        totals.add_records(records);
        totals
    }

    /// Fold more records into the totals
    pub fn add_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        for record in records {
            if let Some(code) = record.affected_category() {
                let total = self.totals.entry(code).or_insert(0);
                *total = total.saturating_add(record.affected_sum());
            }
        }
    }

    pub fn get(&self, code: CategoryCode) -> Option<u64> {
        self.totals.get(&code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryCode, u64)> + '_ {
        self.totals.iter().map(|(code, total)| (*code, *total))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(category: Option<CategoryCode>, counts: Vec<u64>) -> Record {
        let record = Record::new(Utc::now(), counts);
        match category {
            Some(code) => record.with_category(code),
            None => record,
        }
    }

    #[test]
    fn test_category_totals_skip_uncategorized() {
        let records = vec![
            record(Some(2), vec![1, 2]),
            record(None, vec![100]),
            record(Some(1), vec![4]),
            record(Some(2), vec![5]),
        ];

        let totals = CategoryTotals::from_records(&records);
        assert_eq!(totals.iter().collect::<Vec<_>>(), [(1, 4), (2, 8)]);
        assert_eq!(total_affected(&records), 112);
    }

    #[test]
    fn test_add_records_accumulates() {
        let mut totals = CategoryTotals::from_records(&[record(Some(1), vec![3])]);
        totals.add_records(&[record(Some(1), vec![2]), record(Some(9), vec![])]);

        assert_eq!(totals.get(1), Some(5));
        assert_eq!(totals.get(9), Some(0));
        assert_eq!(totals.len(), 2);

        totals.clear();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_totals_saturate() {
        let records = vec![
            record(Some(1), vec![u64::MAX]),
            record(Some(1), vec![7]),
        ];

        assert_eq!(total_affected(&records), u64::MAX);
        assert_eq!(CategoryTotals::from_records(&records).get(1), Some(u64::MAX));
    }
}
