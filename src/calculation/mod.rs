//! Calculation logic for the Workforce Engine.
//!
//! This module contains the pure functions behind attendance and payroll:
//! timestamp parsing, break durations, break conflict detection, worked
//! hours, working day calendars, monthly attendance summaries, salary
//! pro-rating, and display formatting. Nothing here performs I/O.

mod break_duration;
mod formatting;
mod monthly_summary;
mod overlap;
mod salary;
mod timestamps;
mod worked_hours;
mod working_days;

pub use break_duration::{
    break_deduction_minutes, break_duration_minutes, break_duration_minutes_iso,
    total_approved_break_minutes,
};
pub use formatting::{format_currency, format_decimal_hours, format_hours, format_minutes};
pub use monthly_summary::{MonthlyActivity, summarize_month, summary_hours};
pub use overlap::{find_break_conflicts, merge_ranges, overlap_minutes, ranges_overlap};
pub use salary::{
    apply_percentage_increment, attendance_percentage, compute_salary_record, hourly_rate,
    prorated_salary, round_money, salary_change_percentage,
};
pub use timestamps::parse_timestamp;
pub use worked_hours::{WorkedTime, is_late, minutes_to_hours, worked_time};
pub use working_days::{
    count_working_days, is_working_date, leave_days_in_month, month_bounds, working_dates,
};
