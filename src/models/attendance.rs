//! Attendance record model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::TimeRange;

/// A day's check-in/check-out pair for one employee.
///
/// `check_out` is `None` while the employee is still checked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// When the employee checked in.
    pub check_in: DateTime<Utc>,
    /// When the employee checked out, if they have.
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    /// Free-form note entered at check-in or check-out.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// True while the employee has not checked out.
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// The attended window, closed at `now` for open records.
    ///
    /// Returns `None` for an open record when `now` is not given, or when the
    /// end precedes the check-in.
    pub fn window(&self, now: Option<DateTime<Utc>>) -> Option<TimeRange> {
        let end = self.check_out.or(now)?;
        TimeRange::new(self.check_in, end).ok()
    }
}
