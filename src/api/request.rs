//! Request types for the Workforce Engine API.
//!
//! This module defines the JSON request bodies for the break, attendance
//! and salary endpoints.

use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::MonthlyActivity;
use crate::models::{
    AttendanceRecord, BreakRequest, Employee, Holiday, LeaveRequest, Role, default_working_days,
};

/// Request body for `POST /breaks/duration`.
///
/// Timestamps are strings so that both RFC 3339 and offset-less forms are
/// accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakDurationRequest {
    /// Start of the break.
    pub start: String,
    /// End of the break.
    pub end: String,
}

/// Request body for `POST /breaks/conflicts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakConflictRequest {
    /// The break being requested or edited.
    pub candidate: BreakRequest,
    /// Breaks already on record.
    #[serde(default)]
    pub existing: Vec<BreakRequest>,
}

/// Employee information in a monthly request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Weekdays on which attendance is expected.
    #[serde(default = "default_working_days")]
    pub working_days: Vec<Weekday>,
}

/// Request body for `POST /attendance/summary` and `POST /salary/calculate`.
///
/// Holidays given here are added to the configured holidays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRequest {
    /// The employee.
    pub employee: EmployeeRequest,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Break requests in any status.
    #[serde(default)]
    pub breaks: Vec<BreakRequest>,
    /// Leave requests in any status.
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    /// Extra holidays.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Reference time for open records; when absent they are skipped.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl MonthlyRequest {
    /// Splits the request into the employee and the month's activity.
    pub fn into_parts(self, configured_holidays: Vec<Holiday>) -> (Employee, MonthlyActivity) {
        let mut holidays = configured_holidays;
        holidays.extend(self.holidays);
        holidays.sort_by_key(|h| h.date);
        holidays.dedup_by_key(|h| h.date);

        let activity = MonthlyActivity {
            attendance: self.attendance,
            breaks: self.breaks,
            leaves: self.leaves,
            holidays,
        };
        (self.employee.into(), activity)
    }
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            email: String::new(),
            id: req.id,
            full_name: req.full_name,
            role: Role::Employee,
            base_salary: req.base_salary,
            working_days: req.working_days,
            is_active: true,
        }
    }
}
