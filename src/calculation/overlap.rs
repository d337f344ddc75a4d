//! Time range overlap and break conflict detection.
//!
//! Ranges are half-open: a break ending at 12:30 and another starting at
//! 12:30 do not conflict.

use crate::error::EngineResult;
use crate::models::{BreakRequest, TimeRange};

/// Returns true if the two ranges share any instant.
///
/// The check is symmetric. Touching ranges and empty ranges never overlap.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::ranges_overlap;
/// use workforce_engine::models::TimeRange;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();
/// let lunch = TimeRange::new(at(12, 0), at(12, 30)).unwrap();
/// let coffee = TimeRange::new(at(12, 15), at(12, 45)).unwrap();
/// let later = TimeRange::new(at(12, 30), at(13, 0)).unwrap();
///
/// assert!(ranges_overlap(&lunch, &coffee));
/// assert!(ranges_overlap(&coffee, &lunch));
/// assert!(!ranges_overlap(&lunch, &later));
/// ```
pub fn ranges_overlap(a: &TimeRange, b: &TimeRange) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.start < b.end && b.start < a.end
}

/// Minutes shared by two ranges, truncated to whole minutes.
pub fn overlap_minutes(a: &TimeRange, b: &TimeRange) -> i64 {
    a.clip_to(b)
        .map(|shared| shared.duration().num_minutes())
        .unwrap_or(0)
}

/// Finds the breaks that a new or edited break would collide with.
///
/// A conflict is an existing break for the same employee and date, still
/// pending or approved, whose effective window overlaps the candidate's.
/// An existing row with the candidate's own id is skipped so an edit does
/// not conflict with itself.
pub fn find_break_conflicts<'a>(
    candidate: &BreakRequest,
    existing: &'a [BreakRequest],
) -> EngineResult<Vec<&'a BreakRequest>> {
    let window = candidate.effective_window()?;
    let mut conflicts = Vec::new();

    for other in existing {
        if other.id == candidate.id
            || other.employee_id != candidate.employee_id
            || other.date != candidate.date
            || !other.status.is_active()
        {
            continue;
        }
        if ranges_overlap(&window, &other.effective_window()?) {
            conflicts.push(other);
        }
    }

    Ok(conflicts)
}

/// Merges ranges into a sorted list of disjoint ranges.
///
/// Overlapping and touching ranges are joined; empty ranges are dropped.
pub fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}
