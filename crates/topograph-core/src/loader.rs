//! Loading of the events and name files
//!
//! Every raw record is normalized on its own. A malformed record is handled
//! according to [`MalformedPolicy`], the same way for the whole load.

use crate::{normalize, EventIndex, NameTables, RawRecord, Record, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What to do with a record that fails normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MalformedPolicy {
    /// Drop the record and log a warning
    #[default]
    Skip,
    /// Fail the whole load
    Abort,
}

/// Options for loading the events file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
    /// Fail with `EmptyDataset` when no record survives
    #[serde(default)]
    pub require_non_empty: bool,
}

/// Normalized records plus the number of records dropped
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Parse and normalize the events JSON array
pub fn load_records_str(json: &str, options: &LoadOptions) -> Result<LoadedRecords> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut loaded = LoadedRecords {
        records: Vec::with_capacity(values.len()),
        skipped: 0,
    };

    for (position, value) in values.into_iter().enumerate() {
        let normalized = serde_json::from_value::<RawRecord>(value)
            .map_err(|e| crate::Error::MalformedRecord(e.to_string()))
            .and_then(|raw| normalize(&raw));

        match normalized {
            Ok(record) => loaded.records.push(record),
            Err(err) => match options.on_malformed {
                MalformedPolicy::Skip => {
                    tracing::warn!(position, %err, "skipping malformed record");
                    loaded.skipped += 1;
                }
                MalformedPolicy::Abort => return Err(err),
            },
        }
    }

    Ok(loaded)
}

/// Read and normalize an events file
pub fn load_records(path: impl AsRef<Path>, options: &LoadOptions) -> Result<LoadedRecords> {
    let content = fs::read_to_string(path)?;
    load_records_str(&content, options)
}

/// Read an events file straight into an index
pub fn load_index(path: impl AsRef<Path>, options: &LoadOptions) -> Result<EventIndex> {
    let loaded = load_records(path, options)?;
    if options.require_non_empty {
        EventIndex::build_non_empty(loaded.records)
    } else {
        Ok(EventIndex::build(loaded.records))
    }
}

/// Read the name tables file
pub fn load_names(path: impl AsRef<Path>) -> Result<NameTables> {
    let content = fs::read_to_string(path)?;
    NameTables::from_json_str(&content)
}
