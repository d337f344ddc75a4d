//! Break request model and related types.
//!
//! A break request is a time window excluded from worked hours once it is
//! approved. Employees submit requests; HR staff may approve them as
//! requested, approve an adjusted window, or assign a break directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{RequestStatus, TimeRange};
use crate::error::EngineResult;

/// The kind of break being taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    /// A short rest break.
    #[default]
    Short,
    /// A meal break.
    Lunch,
    /// Personal errand.
    Personal,
    /// Anything else.
    Other,
}

/// Who created the break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakSource {
    /// Submitted by the employee for review.
    #[default]
    Employee,
    /// Assigned by HR; approved on creation.
    HrAssigned,
}

/// A requested or assigned break window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee taking the break.
    pub employee_id: String,
    /// The day the break belongs to.
    pub date: NaiveDate,
    /// The kind of break.
    #[serde(default)]
    pub break_type: BreakType,
    /// Start of the window the employee asked for.
    pub requested_start: DateTime<Utc>,
    /// End of the window the employee asked for.
    pub requested_end: DateTime<Utc>,
    /// Start of the window HR approved, when it differs from the request.
    #[serde(default)]
    pub approved_start: Option<DateTime<Utc>>,
    /// End of the window HR approved, when it differs from the request.
    #[serde(default)]
    pub approved_end: Option<DateTime<Utc>>,
    /// Review status.
    #[serde(default)]
    pub status: RequestStatus,
    /// Who created the break.
    #[serde(default)]
    pub source: BreakSource,
    /// Reason given by the requester.
    #[serde(default)]
    pub reason: Option<String>,
    /// Note left by the reviewer.
    #[serde(default)]
    pub reviewer_note: Option<String>,
}

impl BreakRequest {
    /// The window that counts: the approved window when HR set one, the
    /// requested window otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use workforce_engine::models::{BreakRequest, BreakSource, BreakType, RequestStatus};
    /// use chrono::{NaiveDate, TimeZone, Utc};
    ///
    /// let request = BreakRequest {
    ///     id: "brk_001".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     break_type: BreakType::Lunch,
    ///     requested_start: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap(),
    ///     requested_end: Utc.with_ymd_and_hms(2026, 3, 2, 13, 0, 0).unwrap(),
    ///     approved_start: Some(Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()),
    ///     approved_end: Some(Utc.with_ymd_and_hms(2026, 3, 2, 12, 30, 0).unwrap()),
    ///     status: RequestStatus::Approved,
    ///     source: BreakSource::Employee,
    ///     reason: None,
    ///     reviewer_note: None,
    /// };
    /// assert_eq!(request.duration_minutes().unwrap(), 30);
    /// ```
    pub fn effective_window(&self) -> EngineResult<TimeRange> {
        match (self.approved_start, self.approved_end) {
            (Some(start), Some(end)) => TimeRange::new(start, end),
            _ => TimeRange::new(self.requested_start, self.requested_end),
        }
    }

    /// Duration of the effective window in whole minutes.
    pub fn duration_minutes(&self) -> EngineResult<i64> {
        let window = self.effective_window()?;
        crate::calculation::break_duration_minutes(window.start, window.end)
    }

    /// True once HR has approved the break.
    pub fn is_approved(&self) -> bool {
        self.status == RequestStatus::Approved
    }
}
