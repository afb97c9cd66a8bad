//! Calendar day keys
//!
//! Every record is indexed by the UTC calendar date of its `occurred_at`
//! instant. The canonical string form is ISO `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar day (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    /// Create a day from its components, `None` if the date does not exist
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Truncate an instant to its UTC calendar day
    pub fn from_instant(at: &DateTime<Utc>) -> Self {
        Self(at.date_naive())
    }

    /// The underlying date
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The instant at UTC midnight of this day
    pub fn midnight_utc(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::default()).and_utc()
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Day {
    type Err = chrono::ParseError;

    /// Accepts `YYYY-MM-DD` or any instant [`parse_instant`] understands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(date) => Ok(Self(date)),
            Err(err) => parse_instant(s)
                .map(|at| Self::from_instant(&at))
                .ok_or(err),
        }
    }
}

/// Parse a date string into a UTC instant
///
/// Supported shapes, tried in order:
/// - RFC 3339 (`2023-01-05T10:00:00+02:00`)
/// - naive date-time, read as UTC (`2023-01-05T10:00:00`, `2023-01-05 10:00:00`)
/// - plain date, read as UTC midnight (`2023-01-05`)
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
            return Some(at.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| Day(date).midnight_utc())
}
