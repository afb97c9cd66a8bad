//! Topograph Core - Incident records indexed by calendar day
//!
//! This crate provides the data side of the incident timeline:
//! - Normalization of raw JSON records (`RawRecord` → `Record`)
//! - The read-only per-day `EventIndex` and its three query shapes
//!   (last N days, one day, cumulative up to a day)
//! - Category name tables selected by locale
//! - Aggregate counters over record sets
//!
//! ## Example
//!
//! ```
//! use topograph_core::{load_records_str, EventIndex, LoadOptions};
//!
//! let json = r#"[{ "from": "2023-01-01", "affected_number": [10] },
//!                { "from": "2023-01-03", "affected_number": [5] }]"#;
//! let loaded = load_records_str(json, &LoadOptions::default()).unwrap();
//! let index = EventIndex::build(loaded.records);
//!
//! let last = index.last_day().unwrap();
//! assert_eq!(last.to_string(), "2023-01-03");
//! assert_eq!(index.records_up_to_and_including(last).len(), 2);
//! ```

pub mod aggregate;
pub mod day;
mod error;
mod index;
mod loader;
mod names;
mod record;

pub use aggregate::{total_affected, CategoryTotals};
pub use day::Day;
pub use error::{Error, Result};
pub use index::{DayBucket, EventIndex};
pub use loader::{
    load_index, load_names, load_records, load_records_str, LoadOptions, LoadedRecords,
    MalformedPolicy,
};
pub use names::{CategoryLabel, CategoryNames, LocaleNames, NameTables, FALLBACK_LANGUAGE};
pub use record::{normalize, CategoryCode, RawRecord, Record};
