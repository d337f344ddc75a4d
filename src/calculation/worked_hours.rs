//! Worked time calculation functionality.
//!
//! Worked time is the attended window minus approved break time inside it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, BreakRequest};

use super::break_duration::{break_deduction_minutes, round_seconds_to_minutes};

/// Time attended and worked for one attendance record.
///
/// # Example
///
/// ```
/// use workforce_engine::calculation::WorkedTime;
///
/// let worked = WorkedTime {
///     gross_minutes: 510,
///     break_minutes: 30,
///     net_minutes: 480,
/// };
/// assert_eq!(worked.net_hours().to_string(), "8.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedTime {
    /// Minutes between check-in and check-out.
    pub gross_minutes: i64,
    /// Approved break minutes inside the window.
    pub break_minutes: i64,
    /// Gross minus breaks, never negative.
    pub net_minutes: i64,
}

impl WorkedTime {
    /// Net worked time in hours, two decimal places.
    pub fn net_hours(&self) -> Decimal {
        minutes_to_hours(self.net_minutes)
    }
}

/// Computes the worked time for an attendance record.
///
/// Only approved breaks of the same employee are deducted, and only the
/// part of each break inside the attended window. A break is matched by
/// time, not by its date, so a break after midnight on an overnight
/// record still counts.
/// An open record is measured up to `now`.
///
/// # Errors
///
/// `InvalidAttendance` if the record is open and `now` is `None`, or if the
/// record ends before it starts.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::worked_time;
/// use workforce_engine::models::AttendanceRecord;
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let record = AttendanceRecord {
///     id: "att_001".to_string(),
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     check_in: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
///     check_out: Some(Utc.with_ymd_and_hms(2026, 3, 2, 17, 30, 0).unwrap()),
///     notes: None,
/// };
/// let worked = worked_time(&record, &[], None).unwrap();
/// assert_eq!(worked.net_minutes, 510);
/// ```
pub fn worked_time(
    record: &AttendanceRecord,
    breaks: &[BreakRequest],
    now: Option<DateTime<Utc>>,
) -> EngineResult<WorkedTime> {
    let end = record
        .check_out
        .or(now)
        .ok_or_else(|| EngineError::InvalidAttendance {
            record_id: record.id.clone(),
            message: "record is still open".to_string(),
        })?;
    if end < record.check_in {
        return Err(EngineError::InvalidAttendance {
            record_id: record.id.clone(),
            message: "check-out is before check-in".to_string(),
        });
    }
    let window = record
        .window(Some(end))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("attendance window for '{}' could not be built", record.id),
        })?;

    let own_breaks: Vec<BreakRequest> = breaks
        .iter()
        .filter(|b| b.employee_id == record.employee_id)
        .cloned()
        .collect();

    let gross_minutes = round_seconds_to_minutes(window.duration().num_seconds());
    let break_minutes = break_deduction_minutes(&window, &own_breaks)?;
    let net_minutes = (gross_minutes - break_minutes).max(0);

    Ok(WorkedTime {
        gross_minutes,
        break_minutes,
        net_minutes,
    })
}

/// Converts minutes to hours rounded to two decimal places.
///
/// ```
/// use workforce_engine::calculation::minutes_to_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(minutes_to_hours(90), Decimal::new(150, 2));
/// assert_eq!(minutes_to_hours(20), Decimal::new(33, 2));
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    let mut hours = (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    hours.rescale(2);
    hours
}

/// Returns true if a check-in is later than office start plus the grace
/// period, in the office's local time.
///
/// The threshold is taken on the attendance `date`, so a night-shift
/// check-in recorded against the previous date is never late.
pub fn is_late(check_in: DateTime<Utc>, date: NaiveDate, policy: &PolicyConfig) -> bool {
    let offset = Duration::minutes(i64::from(policy.utc_offset_minutes));
    let local_check_in = check_in.naive_utc() + offset;
    let threshold =
        date.and_time(policy.office_start) + Duration::minutes(policy.late_grace_minutes);
    local_check_in > threshold
}
