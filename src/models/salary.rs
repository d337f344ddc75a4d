//! Monthly summary and salary models.
//!
//! This module contains the [`MonthlySummary`] produced from a month of
//! attendance, the [`SalaryRecord`] derived from it, and the
//! [`SalaryChange`] rows that schedule base salary adjustments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregated attendance for one employee over one calendar month.
///
/// # Example
///
/// ```
/// use workforce_engine::models::MonthlySummary;
/// use rust_decimal::Decimal;
///
/// let summary = MonthlySummary {
///     employee_id: "emp_001".to_string(),
///     year: 2026,
///     month: 3,
///     working_days: 22,
///     present_days: 20,
///     absent_days: 1,
///     late_days: 2,
///     paid_leave_days: 1,
///     unpaid_leave_days: 0,
///     total_worked_minutes: 9600,
///     total_break_minutes: 600,
///     average_daily_hours: Decimal::new(800, 2),
///     attendance_percentage: Decimal::new(9091, 2),
/// };
/// assert_eq!(summary.paid_days(), 21);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The employee summarised.
    pub employee_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Days attendance was expected.
    pub working_days: u32,
    /// Working days with a completed attendance record.
    pub present_days: u32,
    /// Working days with neither attendance nor approved leave.
    pub absent_days: u32,
    /// Present days where check-in came after the grace period.
    pub late_days: u32,
    /// Working days covered by approved paid leave.
    pub paid_leave_days: u32,
    /// Working days covered by approved unpaid leave.
    pub unpaid_leave_days: u32,
    /// Minutes worked after break deductions.
    pub total_worked_minutes: i64,
    /// Minutes deducted for approved breaks.
    pub total_break_minutes: i64,
    /// Worked hours per present day, two decimal places.
    pub average_daily_hours: Decimal,
    /// Present days as a percentage of working days.
    pub attendance_percentage: Decimal,
}

impl MonthlySummary {
    /// Days that count towards salary: present days plus paid leave, capped
    /// at the number of working days.
    pub fn paid_days(&self) -> u32 {
        (self.present_days + self.paid_leave_days).min(self.working_days)
    }
}

/// Salary figures for one employee and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// The employee paid.
    pub employee_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Monthly base salary used.
    pub base_salary: Decimal,
    /// Days attendance was expected.
    pub working_days: u32,
    /// Days with completed attendance.
    pub present_days: u32,
    /// Days of approved paid leave.
    pub paid_leave_days: u32,
    /// Hours worked after break deductions.
    pub hours_worked: Decimal,
    /// Minutes deducted for approved breaks.
    pub break_minutes: i64,
    /// Base salary divided by expected hours in the month.
    pub hourly_rate: Decimal,
    /// Base salary scaled by paid days / working days.
    pub prorated_salary: Decimal,
    /// Hours worked multiplied by the hourly rate.
    pub hours_based_earnings: Decimal,
    /// Present days as a percentage of working days.
    pub attendance_percentage: Decimal,
}

/// A scheduled change to an employee's base salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryChange {
    /// The employee whose salary changes.
    pub employee_id: String,
    /// The salary after the change.
    pub new_base_salary: Decimal,
    /// The first day the new salary applies.
    pub effective_date: NaiveDate,
    /// Whether the backend has already applied the change.
    #[serde(default)]
    pub applied: bool,
}
