//! Detected music time regions.

use serde::{Deserialize, Serialize};

/// A contiguous time span of the input flagged as containing music.
///
/// Times are seconds from the start of the input. Regions arrive from the
/// detection model ordered by start time and non-overlapping; downstream
/// code processes them in the supplied order and does not re-sort or merge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRegion {
    /// Start of the region in seconds (>= 0)
    pub start_time: f64,
    /// End of the region in seconds (> start_time)
    pub end_time: f64,
}

impl TimeRegion {
    /// Create a region spanning `start_time..end_time` seconds.
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Duration of this region in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether the region has a sane span.
    pub fn is_valid(&self) -> bool {
        self.start_time >= 0.0 && self.end_time > self.start_time
    }
}

/// Parse the detection model's JSON output: an array of region objects.
///
/// Extra keys on each object (confidence scores and the like) are ignored.
/// Region order is preserved as returned by the service.
pub fn parse_regions(json: &str) -> Result<Vec<TimeRegion>, serde_json::Error> {
    serde_json::from_str(json)
}
