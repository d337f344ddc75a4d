//! Salary pro-rating and percentage helpers.
//!
//! All monetary results are rounded to two decimal places, midpoint away
//! from zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, MonthlySummary, SalaryRecord};

use super::worked_hours::minutes_to_hours;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a monetary amount to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::InvalidSalaryInput {
            field: field.to_string(),
            message: format!("must not be negative, got {}", value),
        });
    }
    Ok(())
}

/// Pro-rates a base salary by present days over working days.
///
/// Present days beyond the working days are capped, so the result never
/// exceeds the base salary.
///
/// # Errors
///
/// `InvalidSalaryInput` when `working_days` is zero or the base is negative.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::prorated_salary;
/// use rust_decimal::Decimal;
///
/// let base = Decimal::from(3000);
/// assert_eq!(prorated_salary(base, 0, 22).unwrap(), Decimal::ZERO);
/// assert_eq!(prorated_salary(base, 11, 22).unwrap(), Decimal::new(150000, 2));
/// assert_eq!(prorated_salary(base, 20, 22).unwrap(), Decimal::new(272727, 2));
/// ```
pub fn prorated_salary(base: Decimal, present_days: u32, working_days: u32) -> EngineResult<Decimal> {
    ensure_non_negative("base_salary", base)?;
    if working_days == 0 {
        return Err(EngineError::InvalidSalaryInput {
            field: "working_days".to_string(),
            message: "month has no working days".to_string(),
        });
    }
    let present = present_days.min(working_days);
    Ok(round_money(
        base * Decimal::from(present) / Decimal::from(working_days),
    ))
}

/// Present days as a percentage of working days, capped at 100.
///
/// Returns zero when there are no working days.
///
/// ```
/// use workforce_engine::calculation::attendance_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(attendance_percentage(20, 22), Decimal::new(9091, 2));
/// assert_eq!(attendance_percentage(5, 0), Decimal::ZERO);
/// ```
pub fn attendance_percentage(present_days: u32, working_days: u32) -> Decimal {
    if working_days == 0 {
        return round_money(Decimal::ZERO);
    }
    let present = present_days.min(working_days);
    round_money(Decimal::from(present) * HUNDRED / Decimal::from(working_days))
}

/// Base salary divided by the hours expected in the month.
///
/// Not rounded; round the product, not the rate.
pub fn hourly_rate(
    base: Decimal,
    working_days: u32,
    standard_daily_hours: Decimal,
) -> EngineResult<Decimal> {
    ensure_non_negative("base_salary", base)?;
    let expected_hours = Decimal::from(working_days) * standard_daily_hours;
    if expected_hours <= Decimal::ZERO {
        return Err(EngineError::InvalidSalaryInput {
            field: "working_days".to_string(),
            message: "no expected hours in the month".to_string(),
        });
    }
    Ok(base / expected_hours)
}

/// The percentage change from `old` to `new`, two decimal places.
///
/// ```
/// use workforce_engine::calculation::salary_change_percentage;
/// use rust_decimal::Decimal;
///
/// let pct = salary_change_percentage(Decimal::from(3000), Decimal::from(3300)).unwrap();
/// assert_eq!(pct, Decimal::new(1000, 2));
/// ```
pub fn salary_change_percentage(old: Decimal, new: Decimal) -> EngineResult<Decimal> {
    ensure_non_negative("new_base_salary", new)?;
    if old <= Decimal::ZERO {
        return Err(EngineError::InvalidSalaryInput {
            field: "base_salary".to_string(),
            message: "current salary must be positive to compute a change".to_string(),
        });
    }
    Ok(round_money((new - old) * HUNDRED / old))
}

/// Applies a percentage increment (negative for a decrease) to a salary.
///
/// ```
/// use workforce_engine::calculation::apply_percentage_increment;
/// use rust_decimal::Decimal;
///
/// let raised = apply_percentage_increment(Decimal::from(2500), Decimal::new(75, 1)).unwrap();
/// assert_eq!(raised, Decimal::new(268750, 2));
/// ```
pub fn apply_percentage_increment(base: Decimal, percentage: Decimal) -> EngineResult<Decimal> {
    ensure_non_negative("base_salary", base)?;
    let result = round_money(base + base * percentage / HUNDRED);
    ensure_non_negative("new_base_salary", result)?;
    Ok(result)
}

/// Builds the salary record for a monthly summary.
///
/// Paid leave counts as present for pro-rating. Hours-based earnings use
/// the unrounded hourly rate.
pub fn compute_salary_record(
    summary: &MonthlySummary,
    employee: &Employee,
    policy: &PolicyConfig,
) -> EngineResult<SalaryRecord> {
    let base = employee.base_salary;
    let paid_days = summary.paid_days();

    let prorated = prorated_salary(base, paid_days, summary.working_days)?;
    let rate = hourly_rate(base, summary.working_days, policy.standard_daily_hours)?;
    let hours_worked = minutes_to_hours(summary.total_worked_minutes);
    let exact_hours = Decimal::from(summary.total_worked_minutes) / Decimal::from(60);

    Ok(SalaryRecord {
        employee_id: employee.id.clone(),
        year: summary.year,
        month: summary.month,
        base_salary: base,
        working_days: summary.working_days,
        present_days: summary.present_days,
        paid_leave_days: summary.paid_leave_days,
        hours_worked,
        break_minutes: summary.total_break_minutes,
        hourly_rate: round_money(rate),
        prorated_salary: prorated,
        hours_based_earnings: round_money(exact_hours * rate),
        attendance_percentage: summary.attendance_percentage,
    })
}
