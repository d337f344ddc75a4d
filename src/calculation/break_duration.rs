//! Break duration and deduction functionality.
//!
//! This module turns break windows into minutes: the duration of a single
//! break, the approved break total for a day, and the deduction applied to
//! an attendance window.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{BreakRequest, TimeRange};

use super::overlap::merge_ranges;
use super::timestamps::parse_timestamp;

/// Computes a break's duration in whole minutes.
///
/// The duration is rounded to the nearest minute, with exactly thirty
/// seconds rounding up.
///
/// # Returns
///
/// The duration in minutes, `0` when `start == end`, or `InvalidBreak` when
/// `end` precedes `start`.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::break_duration_minutes;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 3, 2, 12, 30, 0).unwrap();
/// assert_eq!(break_duration_minutes(start, end).unwrap(), 30);
/// ```
pub fn break_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> EngineResult<i64> {
    if end < start {
        return Err(EngineError::InvalidBreak {
            message: format!(
                "break ends at {} before it starts at {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
        });
    }
    Ok(round_seconds_to_minutes((end - start).num_seconds()))
}

/// Same as [`break_duration_minutes`], for two ISO timestamp strings.
///
/// ```
/// use workforce_engine::calculation::break_duration_minutes_iso;
///
/// let minutes = break_duration_minutes_iso("2026-03-02T12:00:00Z", "2026-03-02T12:30:00Z");
/// assert_eq!(minutes.unwrap(), 30);
/// ```
pub fn break_duration_minutes_iso(start: &str, end: &str) -> EngineResult<i64> {
    break_duration_minutes(parse_timestamp(start)?, parse_timestamp(end)?)
}

/// Sums the durations of approved breaks taken on `date`.
///
/// Pending, rejected and cancelled breaks contribute nothing. Breaks are
/// summed as-is; use [`break_deduction_minutes`] when overlapping breaks
/// must not be counted twice.
pub fn total_approved_break_minutes(breaks: &[BreakRequest], date: NaiveDate) -> EngineResult<i64> {
    breaks
        .iter()
        .filter(|b| b.is_approved() && b.date == date)
        .map(BreakRequest::duration_minutes)
        .sum()
}

/// Minutes of approved break time that fall inside an attendance window.
///
/// Each approved break is clipped to the window; overlapping breaks are
/// merged before summing so no minute is deducted twice.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::break_deduction_minutes;
/// use workforce_engine::models::{BreakRequest, BreakSource, BreakType, RequestStatus, TimeRange};
/// use chrono::{NaiveDate, TimeZone, Utc};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();
/// let lunch = BreakRequest {
///     id: "brk_1".to_string(),
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     break_type: BreakType::Lunch,
///     requested_start: at(16, 30),
///     requested_end: at(17, 30),
///     approved_start: None,
///     approved_end: None,
///     status: RequestStatus::Approved,
///     source: BreakSource::Employee,
///     reason: None,
///     reviewer_note: None,
/// };
/// let attended = TimeRange::new(at(9, 0), at(17, 0)).unwrap();
/// // Only the half hour before check-out counts.
/// assert_eq!(break_deduction_minutes(&attended, &[lunch]).unwrap(), 30);
/// ```
pub fn break_deduction_minutes(window: &TimeRange, breaks: &[BreakRequest]) -> EngineResult<i64> {
    let mut clipped = Vec::new();
    for brk in breaks.iter().filter(|b| b.is_approved()) {
        if let Some(part) = brk.effective_window()?.clip_to(window) {
            clipped.push(part);
        }
    }

    let seconds: i64 = merge_ranges(clipped)
        .iter()
        .map(|r| r.duration().num_seconds())
        .sum();
    Ok(round_seconds_to_minutes(seconds))
}

pub(crate) fn round_seconds_to_minutes(seconds: i64) -> i64 {
    (seconds + 30).div_euclid(60)
}
