//! Leave request and holiday models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::RequestStatus;
use crate::error::{EngineError, EngineResult};

/// The kind of leave requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Sick leave.
    Sick,
    /// Casual leave.
    Casual,
    /// Annual / earned leave.
    Annual,
    /// Leave without pay.
    Unpaid,
}

/// A request for one or more days off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee requesting leave.
    pub employee_id: String,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Review status.
    #[serde(default)]
    pub status: RequestStatus,
    /// Reason given by the requester.
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveRequest {
    /// Checks that the date range is not reversed.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidLeave {
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }
        Ok(())
    }

    /// True if the leave covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// True if the two requests share at least one day.
    ///
    /// ```
    /// use workforce_engine::models::{LeaveRequest, LeaveType, RequestStatus};
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
    /// let a = LeaveRequest {
    ///     id: "l1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     leave_type: LeaveType::Annual,
    ///     start_date: d(2),
    ///     end_date: d(4),
    ///     status: RequestStatus::Pending,
    ///     reason: None,
    /// };
    /// let mut b = a.clone();
    /// b.start_date = d(4);
    /// b.end_date = d(6);
    /// assert!(a.overlaps(&b));
    /// ```
    pub fn overlaps(&self, other: &LeaveRequest) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// A company holiday. Holidays are never counted as working days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}
