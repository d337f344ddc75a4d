//! Half-open time range used for breaks and attendance windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A half-open interval `[start, end)` of UTC instants.
///
/// # Example
///
/// ```
/// use workforce_engine::models::TimeRange;
/// use chrono::{TimeZone, Utc};
///
/// let range = TimeRange::new(
///     Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2026, 3, 2, 12, 30, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(range.duration().num_minutes(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a range, rejecting an end before the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidBreak {
                message: format!("end {} is before start {}", end.to_rfc3339(), start.to_rfc3339()),
            });
        }
        Ok(Self { start, end })
    }

    /// Length of the range.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// True when the range covers no time.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the part of `self` that lies inside `other`, if any.
    pub fn clip_to(&self, other: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeRange { start, end })
    }
}
