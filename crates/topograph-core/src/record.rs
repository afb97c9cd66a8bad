//! Incident records and the normalizer that produces them
//!
//! `RawRecord` mirrors one entry of the input data file. `normalize` turns it
//! into a canonical [`Record`] or fails with [`Error::MalformedRecord`]; it
//! has no other effect.

use crate::{Day, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Impact category code
pub type CategoryCode = u32;

/// One entry of the input data file, as loaded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Date string of the incident
    pub from: String,
    /// Latitude (number or numeric string)
    #[serde(default)]
    pub lat: Option<Value>,
    /// Longitude (number or numeric string)
    #[serde(default)]
    pub lon: Option<Value>,
    /// Category array, only the first element is meaningful
    #[serde(default)]
    pub affected_type: Option<Vec<Value>>,
    /// Magnitudes per sub-incident
    #[serde(default)]
    pub affected_number: Option<Vec<Value>>,
}

/// A normalized incident
///
/// Immutable once built: `affected_sum` is derived from `affected_counts`
/// at construction and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    occurred_at: DateTime<Utc>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    affected_category: Option<CategoryCode>,
    affected_counts: Vec<u64>,
    affected_sum: u64,
}

impl Record {
    /// Create a record without location or category
    ///
    /// `affected_sum` saturates at `u64::MAX`; [`normalize`] rejects such input.
    pub fn new(occurred_at: DateTime<Utc>, affected_counts: Vec<u64>) -> Self {
        let affected_sum = affected_counts
            .iter()
            .fold(0u64, |sum, count| sum.saturating_add(*count));
        Self {
            occurred_at,
            latitude: None,
            longitude: None,
            affected_category: None,
            affected_counts,
            affected_sum,
        }
    }

    /// Set the coordinates
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the impact category
    pub fn with_category(mut self, code: CategoryCode) -> Self {
        self.affected_category = Some(code);
        self
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// The calendar day this record is indexed under
    pub fn day(&self) -> Day {
        Day::from_instant(&self.occurred_at)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// `(latitude, longitude)` when both are known
    ///
    /// Records without coordinates are skipped by spatial views but still
    /// count in aggregates.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// `None` means uncategorized
    pub fn affected_category(&self) -> Option<CategoryCode> {
        self.affected_category
    }

    pub fn affected_counts(&self) -> &[u64] {
        &self.affected_counts
    }

    pub fn affected_sum(&self) -> u64 {
        self.affected_sum
    }
}

impl TryFrom<RawRecord> for Record {
    type Error = Error;

    fn try_from(raw: RawRecord) -> Result<Self> {
        normalize(&raw)
    }
}

/// Convert a raw record into its canonical form
pub fn normalize(raw: &RawRecord) -> Result<Record> {
    let occurred_at = crate::day::parse_instant(&raw.from)
        .ok_or_else(|| Error::MalformedRecord(format!("unparsable date {:?}", raw.from)))?;

    let affected_counts = raw
        .affected_number
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(coerce_magnitude)
        .collect::<Result<Vec<_>>>()?;
    affected_counts
        .iter()
        .try_fold(0u64, |sum, count| sum.checked_add(*count))
        .ok_or_else(|| Error::MalformedRecord("affected sum overflows".to_string()))?;

    let affected_category = match raw.affected_type.as_deref().and_then(|a| a.first()) {
        Some(value) => Some(coerce_category(value)?),
        None => None,
    };

    let mut record = Record::new(occurred_at, affected_counts);
    record.affected_category = affected_category;
    record.latitude = raw.lat.as_ref().and_then(coerce_coordinate);
    record.longitude = raw.lon.as_ref().and_then(coerce_coordinate);
    Ok(record)
}

/// Numbers pass through, numeric strings are parsed, everything else is `None`
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Whole non-negative number
fn coerce_whole(value: &Value) -> Option<u64> {
    coerce_number(value)
        .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
}

fn coerce_magnitude(value: &Value) -> Result<u64> {
    coerce_whole(value)
        .ok_or_else(|| Error::MalformedRecord(format!("invalid magnitude {value}")))
}

fn coerce_category(value: &Value) -> Result<CategoryCode> {
    coerce_whole(value)
        .and_then(|n| CategoryCode::try_from(n).ok())
        .ok_or_else(|| Error::MalformedRecord(format!("invalid category {value}")))
}

fn coerce_coordinate(value: &Value) -> Option<f64> {
    let coordinate = coerce_number(value);
    if coordinate.is_none() && !value.is_null() {
        tracing::debug!(%value, "ignoring non-numeric coordinate");
    }
    coordinate
}
