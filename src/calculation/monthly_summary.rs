//! Monthly attendance summary.
//!
//! This module folds a month of attendance, breaks and leave into a
//! [`MonthlySummary`] for one employee.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PolicyConfig;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, BreakRequest, Employee, Holiday, LeaveRequest, MonthlySummary, RequestStatus,
};

use super::salary::attendance_percentage;
use super::worked_hours::{is_late, minutes_to_hours, worked_time};
use super::working_days::{month_bounds, working_dates};

/// Raw rows for one employee and month, as fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Break requests in any status.
    #[serde(default)]
    pub breaks: Vec<BreakRequest>,
    /// Leave requests in any status.
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    /// Company holidays.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

/// Summarises one month of activity for an employee.
///
/// # Behavior
///
/// - Rows for other employees or outside the month are ignored.
/// - A working date is *present* when it has at least one closed
///   attendance record; open records are skipped.
/// - Worked and break minutes include closed records on non-working days
///   and, when `now` is given, open records.
/// - The daily average covers closed records on present days only.
/// - Approved leave fills working dates that are not present; overlapping
///   leaves count each date once.
/// - The employee's own working week is used; an empty one falls back to
///   the policy's default week.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::{summarize_month, MonthlyActivity};
/// use workforce_engine::config::PolicyConfig;
/// use workforce_engine::models::{AttendanceRecord, Employee, Role, default_working_days};
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     full_name: "Sam Carter".to_string(),
///     email: "sam@example.com".to_string(),
///     role: Role::Employee,
///     base_salary: Decimal::from(3000),
///     working_days: default_working_days(),
///     is_active: true,
/// };
/// let activity = MonthlyActivity {
///     attendance: vec![AttendanceRecord {
///         id: "att_1".to_string(),
///         employee_id: "emp_001".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///         check_in: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
///         check_out: Some(Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap()),
///         notes: None,
///     }],
///     ..MonthlyActivity::default()
/// };
///
/// let summary = summarize_month(&employee, 2026, 3, &activity, &PolicyConfig::default(), None).unwrap();
/// assert_eq!(summary.working_days, 22);
/// assert_eq!(summary.present_days, 1);
/// assert_eq!(summary.absent_days, 21);
/// assert_eq!(summary.total_worked_minutes, 480);
/// ```
pub fn summarize_month(
    employee: &Employee,
    year: i32,
    month: u32,
    activity: &MonthlyActivity,
    policy: &PolicyConfig,
    now: Option<DateTime<Utc>>,
) -> EngineResult<MonthlySummary> {
    let (first, last) = month_bounds(year, month)?;
    let in_month = |d: NaiveDate| d >= first && d <= last;

    let week = if employee.working_days.is_empty() {
        &policy.default_working_days
    } else {
        &employee.working_days
    };
    let expected: BTreeSet<NaiveDate> = working_dates(year, month, week, &activity.holidays)?
        .into_iter()
        .collect();

    // Breaks are matched to records by time, so one dated the day after the
    // month can still fall inside an overnight record.
    let breaks: Vec<BreakRequest> = activity
        .breaks
        .iter()
        .filter(|b| b.employee_id == employee.id)
        .cloned()
        .collect();

    let mut total_worked_minutes = 0i64;
    let mut total_break_minutes = 0i64;
    // Earliest check-in and closed worked minutes per date.
    let mut first_check_in: BTreeMap<NaiveDate, DateTime<Utc>> = BTreeMap::new();
    let mut closed_minutes: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    for record in activity
        .attendance
        .iter()
        .filter(|r| r.employee_id == employee.id && in_month(r.date))
    {
        if record.is_open() && now.is_none() {
            debug!(record_id = %record.id, "Skipping open attendance record");
            continue;
        }
        let worked = worked_time(record, &breaks, now)?;
        total_worked_minutes += worked.net_minutes;
        total_break_minutes += worked.break_minutes;
        // A day is only present once the record is closed.
        if record.is_open() {
            continue;
        }
        *closed_minutes.entry(record.date).or_insert(0) += worked.net_minutes;
        first_check_in
            .entry(record.date)
            .and_modify(|t| *t = (*t).min(record.check_in))
            .or_insert(record.check_in);
    }

    let present: BTreeSet<NaiveDate> = first_check_in
        .keys()
        .copied()
        .filter(|d| expected.contains(d))
        .collect();
    let late_days = present
        .iter()
        .filter(|d| is_late(first_check_in[*d], **d, policy))
        .count() as u32;

    let approved_leaves: Vec<&LeaveRequest> = activity
        .leaves
        .iter()
        .filter(|l| l.employee_id == employee.id && l.status == RequestStatus::Approved)
        .collect();
    let mut paid_leave_days = 0u32;
    let mut unpaid_leave_days = 0u32;
    for date in expected.iter().filter(|d| !present.contains(*d)) {
        let covering: Vec<&&LeaveRequest> =
            approved_leaves.iter().filter(|l| l.covers(*date)).collect();
        if covering.is_empty() {
            continue;
        }
        if covering.iter().any(|l| policy.is_paid_leave(l.leave_type)) {
            paid_leave_days += 1;
        } else {
            unpaid_leave_days += 1;
        }
    }

    let working_days = expected.len() as u32;
    let present_days = present.len() as u32;
    let absent_days = working_days
        .saturating_sub(present_days)
        .saturating_sub(paid_leave_days)
        .saturating_sub(unpaid_leave_days);

    let present_minutes: i64 = present
        .iter()
        .map(|d| closed_minutes.get(d).copied().unwrap_or(0))
        .sum();
    let average_daily_hours = if present_days > 0 {
        minutes_to_hours(present_minutes / i64::from(present_days))
    } else {
        minutes_to_hours(0)
    };

    debug!(
        employee_id = %employee.id,
        year,
        month,
        working_days,
        present_days,
        "Summarised month"
    );

    Ok(MonthlySummary {
        employee_id: employee.id.clone(),
        year,
        month,
        working_days,
        present_days,
        absent_days,
        late_days,
        paid_leave_days,
        unpaid_leave_days,
        total_worked_minutes,
        total_break_minutes,
        average_daily_hours,
        attendance_percentage: attendance_percentage(present_days, working_days),
    })
}

/// Total worked hours in a summary, two decimal places.
pub fn summary_hours(summary: &MonthlySummary) -> Decimal {
    minutes_to_hours(summary.total_worked_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreakSource, BreakType, LeaveType, Role, default_working_days};
    use chrono::TimeZone;

    fn employee() -> Employee {
        Employee {
            id: "emp_001".to_string(),
            full_name: "Sam Carter".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Employee,
            base_salary: Decimal::from(3000),
            working_days: default_working_days(),
            is_active: true,
        }
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn attendance(day: u32, start: (u32, u32), end: Option<(u32, u32)>) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("att_{}_{}", day, start.0),
            employee_id: "emp_001".to_string(),
            date: d(day),
            check_in: at(day, start.0, start.1),
            check_out: end.map(|(h, m)| at(day, h, m)),
            notes: None,
        }
    }

    fn leave(start: u32, end: u32, leave_type: LeaveType, status: RequestStatus) -> LeaveRequest {
        LeaveRequest {
            id: format!("lv_{}", start),
            employee_id: "emp_001".to_string(),
            leave_type,
            start_date: d(start),
            end_date: d(end),
            status,
            reason: None,
        }
    }

    fn summarize(activity: &MonthlyActivity) -> MonthlySummary {
        summarize_month(&employee(), 2026, 3, activity, &PolicyConfig::default(), None).unwrap()
    }

    #[test]
    fn test_empty_month_is_all_absent() {
        let summary = summarize(&MonthlyActivity::default());
        assert_eq!(summary.working_days, 22);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.absent_days, 22);
        assert_eq!(summary.attendance_percentage, Decimal::ZERO);
        assert_eq!(summary.average_daily_hours, Decimal::ZERO);
    }

    #[test]
    fn test_breaks_deducted_and_late_days_counted() {
        let activity = MonthlyActivity {
            attendance: vec![
                attendance(2, (9, 0), Some((17, 30))),
                attendance(3, (9, 40), Some((18, 10))),
            ],
            breaks: vec![BreakRequest {
                id: "brk_1".to_string(),
                employee_id: "emp_001".to_string(),
                date: d(2),
                break_type: BreakType::Lunch,
                requested_start: at(2, 12, 0),
                requested_end: at(2, 12, 30),
                approved_start: None,
                approved_end: None,
                status: RequestStatus::Approved,
                source: BreakSource::Employee,
                reason: None,
                reviewer_note: None,
            }],
            ..MonthlyActivity::default()
        };

        let summary = summarize(&activity);
        assert_eq!(summary.present_days, 2);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.total_break_minutes, 30);
        assert_eq!(summary.total_worked_minutes, 480 + 510);
        assert_eq!(summary.average_daily_hours, Decimal::new(825, 2));
    }

    #[test]
    fn test_split_day_counts_once_with_earliest_check_in() {
        let activity = MonthlyActivity {
            attendance: vec![
                attendance(2, (13, 0), Some((17, 0))),
                attendance(2, (9, 0), Some((12, 0))),
            ],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.late_days, 0);
        assert_eq!(summary.total_worked_minutes, 420);
    }

    #[test]
    fn test_open_record_not_present() {
        let activity = MonthlyActivity {
            attendance: vec![attendance(2, (9, 0), None)],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.total_worked_minutes, 0);
    }

    #[test]
    fn test_open_record_counts_hours_with_now() {
        let activity = MonthlyActivity {
            attendance: vec![attendance(2, (9, 0), None)],
            ..MonthlyActivity::default()
        };
        let summary = summarize_month(
            &employee(),
            2026,
            3,
            &activity,
            &PolicyConfig::default(),
            Some(at(2, 11, 0)),
        )
        .unwrap();
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.total_worked_minutes, 120);
    }

    #[test]
    fn test_average_ignores_open_and_non_working_days() {
        let activity = MonthlyActivity {
            attendance: vec![
                attendance(2, (9, 0), Some((17, 0))),
                attendance(3, (9, 0), None),
                attendance(7, (10, 0), Some((14, 0))),
            ],
            ..MonthlyActivity::default()
        };
        let summary = summarize_month(
            &employee(),
            2026,
            3,
            &activity,
            &PolicyConfig::default(),
            Some(at(3, 13, 0)),
        )
        .unwrap();
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.total_worked_minutes, 480 + 240 + 240);
        assert_eq!(summary.average_daily_hours, Decimal::new(800, 2));
    }

    #[test]
    fn test_overnight_break_on_first_of_next_month_deducted() {
        let record = AttendanceRecord {
            id: "att_31".to_string(),
            employee_id: "emp_001".to_string(),
            date: d(31),
            check_in: at(31, 22, 0),
            check_out: Some(Utc.with_ymd_and_hms(2026, 4, 1, 6, 0, 0).unwrap()),
            notes: None,
        };
        let brk = BreakRequest {
            id: "brk_night".to_string(),
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            break_type: BreakType::Short,
            requested_start: Utc.with_ymd_and_hms(2026, 4, 1, 1, 0, 0).unwrap(),
            requested_end: Utc.with_ymd_and_hms(2026, 4, 1, 1, 30, 0).unwrap(),
            approved_start: None,
            approved_end: None,
            status: RequestStatus::Approved,
            source: BreakSource::Employee,
            reason: None,
            reviewer_note: None,
        };
        let activity = MonthlyActivity {
            attendance: vec![record],
            breaks: vec![brk],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        assert_eq!(summary.total_break_minutes, 30);
        assert_eq!(summary.total_worked_minutes, 450);
    }

    #[test]
    fn test_weekend_work_adds_hours_not_presence() {
        let activity = MonthlyActivity {
            attendance: vec![attendance(7, (10, 0), Some((14, 0)))],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        assert_eq!(summary.present_days, 0);
        assert_eq!(summary.total_worked_minutes, 240);
    }

    #[test]
    fn test_leave_days_split_paid_and_unpaid() {
        let activity = MonthlyActivity {
            attendance: vec![attendance(4, (9, 0), Some((17, 0)))],
            leaves: vec![
                leave(2, 4, LeaveType::Sick, RequestStatus::Approved),
                leave(9, 10, LeaveType::Unpaid, RequestStatus::Approved),
                leave(11, 11, LeaveType::Annual, RequestStatus::Pending),
            ],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.paid_leave_days, 2);
        assert_eq!(summary.unpaid_leave_days, 2);
        assert_eq!(summary.absent_days, 22 - 1 - 2 - 2);
    }

    #[test]
    fn test_overlapping_leaves_count_dates_once() {
        let activity = MonthlyActivity {
            leaves: vec![
                leave(2, 4, LeaveType::Annual, RequestStatus::Approved),
                leave(3, 5, LeaveType::Unpaid, RequestStatus::Approved),
            ],
            ..MonthlyActivity::default()
        };
        let summary = summarize(&activity);
        // 2-4 paid (the 3rd and 4th are also covered by paid leave), 5 unpaid.
        assert_eq!(summary.paid_leave_days, 3);
        assert_eq!(summary.unpaid_leave_days, 1);
    }

    #[test]
    fn test_other_employee_and_month_ignored() {
        let mut foreign = attendance(2, (9, 0), Some((17, 0)));
        foreign.employee_id = "emp_002".to_string();
        let mut april = attendance(2, (9, 0), Some((17, 0)));
        april.date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

        let activity = MonthlyActivity {
            attendance: vec![foreign, april],
            ..MonthlyActivity::default()
        };
        assert_eq!(summarize(&activity).present_days, 0);
    }

    #[test]
    fn test_summary_hours() {
        let activity = MonthlyActivity {
            attendance: vec![attendance(2, (9, 0), Some((17, 20)))],
            ..MonthlyActivity::default()
        };
        assert_eq!(summary_hours(&summarize(&activity)), Decimal::new(833, 2));
    }
}
