//! Playback configuration
//!
//! Loaded from RON; every field has a default so partial files work:
//!
//! ```ron
//! (
//!     interval_ms: 500,
//!     window_days: 60,
//!     loading: (on_malformed: Abort),
//! )
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use topograph_core::LoadOptions;

/// Default auto-advance interval
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
/// Default number of days shown on the timeline
pub const DEFAULT_WINDOW_DAYS: usize = 100;
/// Default duration of counter and marker animations
pub const DEFAULT_ANIMATION_MS: u64 = 1000;

/// Settings for the controller and its views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Time between two auto-advance ticks
    pub interval_ms: u64,
    /// Days shown on the timeline (`lastNDays` window)
    pub window_days: usize,
    /// Duration of value transitions and dot reveal
    pub animation_ms: u64,
    /// How the events file is loaded
    pub loading: LoadOptions,
}

impl PlaybackConfig {
    /// Parse a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Set the auto-advance interval
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Auto-advance interval, never zero
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            window_days: DEFAULT_WINDOW_DAYS,
            animation_ms: DEFAULT_ANIMATION_MS,
            loading: LoadOptions::default(),
        }
    }
}
