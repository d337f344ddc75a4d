//! Working day calendar logic.
//!
//! A working day is a date whose weekday is in the employee's working week
//! and which is not a company holiday.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{EngineError, EngineResult};
use crate::models::{Holiday, LeaveRequest};

/// Returns the first and last date of a calendar month.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (first, last) = month_bounds(2028, 2).unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2028, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// assert!(month_bounds(2026, 13).is_err());
/// ```
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidPeriod { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Returns every working date in the month, in order.
pub fn working_dates(
    year: i32,
    month: u32,
    working_days: &[Weekday],
    holidays: &[Holiday],
) -> EngineResult<Vec<NaiveDate>> {
    let (first, last) = month_bounds(year, month)?;
    Ok(first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| is_working_date(*d, working_days, holidays))
        .collect())
}

/// Counts the working days in a month.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::count_working_days;
/// use workforce_engine::models::default_working_days;
///
/// // March 2026 has 22 weekdays.
/// assert_eq!(count_working_days(2026, 3, &default_working_days(), &[]).unwrap(), 22);
/// ```
pub fn count_working_days(
    year: i32,
    month: u32,
    working_days: &[Weekday],
    holidays: &[Holiday],
) -> EngineResult<u32> {
    Ok(working_dates(year, month, working_days, holidays)?.len() as u32)
}

/// True if attendance is expected on `date`.
pub fn is_working_date(date: NaiveDate, working_days: &[Weekday], holidays: &[Holiday]) -> bool {
    working_days.contains(&date.weekday()) && !holidays.iter().any(|h| h.date == date)
}

/// Counts the working days of the month covered by a leave request.
///
/// The request's status is not checked; callers pass approved leave.
pub fn leave_days_in_month(
    leave: &LeaveRequest,
    year: i32,
    month: u32,
    working_days: &[Weekday],
    holidays: &[Holiday],
) -> EngineResult<u32> {
    leave.validate()?;
    Ok(working_dates(year, month, working_days, holidays)?
        .into_iter()
        .filter(|d| leave.covers(*d))
        .count() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeaveType, RequestStatus, default_working_days};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_december_bounds_roll_year() {
        let (first, last) = month_bounds(2026, 12).unwrap();
        assert_eq!(first, d(2026, 12, 1));
        assert_eq!(last, d(2026, 12, 31));
    }

    #[test]
    fn test_invalid_month_zero() {
        assert!(matches!(
            month_bounds(2026, 0),
            Err(EngineError::InvalidPeriod { year: 2026, month: 0 })
        ));
    }

    #[test]
    fn test_holidays_excluded() {
        let holidays = vec![Holiday {
            date: d(2026, 5, 1),
            name: "Labour Day".to_string(),
        }];
        // May 2026: 21 weekdays, 1 May is a Friday.
        assert_eq!(count_working_days(2026, 5, &default_working_days(), &[]).unwrap(), 21);
        assert_eq!(
            count_working_days(2026, 5, &default_working_days(), &holidays).unwrap(),
            20
        );
    }

    #[test]
    fn test_holiday_on_weekend_changes_nothing() {
        let holidays = vec![Holiday {
            date: d(2026, 12, 26),
            name: "Boxing Day".to_string(),
        }];
        assert_eq!(
            count_working_days(2026, 12, &default_working_days(), &holidays).unwrap(),
            count_working_days(2026, 12, &default_working_days(), &[]).unwrap()
        );
    }

    #[test]
    fn test_custom_working_week() {
        let week = [Weekday::Sat, Weekday::Sun];
        // March 2026 has 4 Saturdays and 5 Sundays.
        assert_eq!(count_working_days(2026, 3, &week, &[]).unwrap(), 9);
    }

    #[test]
    fn test_empty_working_week() {
        assert_eq!(count_working_days(2026, 3, &[], &[]).unwrap(), 0);
    }

    #[test]
    fn test_working_days_never_exceed_month_length() {
        let all = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        for month in 1..=12 {
            let (_, last) = month_bounds(2026, month).unwrap();
            assert_eq!(count_working_days(2026, month, &all, &[]).unwrap(), last.day());
        }
    }

    #[test]
    fn test_leave_spanning_month_boundary() {
        let leave = LeaveRequest {
            id: "lv_1".to_string(),
            employee_id: "emp_001".to_string(),
            leave_type: LeaveType::Annual,
            start_date: d(2026, 3, 30),
            end_date: d(2026, 4, 3),
            status: RequestStatus::Approved,
            reason: None,
        };
        // Mon 30 and Tue 31 March.
        assert_eq!(
            leave_days_in_month(&leave, 2026, 3, &default_working_days(), &[]).unwrap(),
            2
        );
        // Wed 1 to Fri 3 April.
        assert_eq!(
            leave_days_in_month(&leave, 2026, 4, &default_working_days(), &[]).unwrap(),
            3
        );
    }
}
