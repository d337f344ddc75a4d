//! Display formatting for durations and money.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;

use crate::config::CurrencyFormat;

/// Formats a minute count as hours and minutes.
///
/// Whole hours drop the minutes part, and durations under an hour drop the
/// hours part. Negative values keep a leading `-`.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::format_minutes;
///
/// assert_eq!(format_minutes(510), "8h 30m");
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(480), "8h");
/// assert_eq!(format_minutes(0), "0m");
/// ```
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let total = minutes.unsigned_abs();
    let hours = total / 60;
    let mins = total % 60;

    match (hours, mins) {
        (0, m) => format!("{}{}m", sign, m),
        (h, 0) => format!("{}{}h", sign, h),
        (h, m) => format!("{}{}h {}m", sign, h, m),
    }
}

/// Formats fractional hours the same way as [`format_minutes`], rounding to
/// the nearest minute.
///
/// ```
/// use workforce_engine::calculation::format_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_hours(Decimal::new(85, 1)), "8h 30m");
/// assert_eq!(format_hours(Decimal::new(75, 2)), "45m");
/// ```
pub fn format_hours(hours: Decimal) -> String {
    // Values past the i64 range saturate rather than wrap.
    let saturated = if hours.is_sign_negative() { i64::MIN } else { i64::MAX };
    let minutes = hours
        .checked_mul(Decimal::from(60))
        .and_then(|m| {
            m.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .unwrap_or(saturated);
    format_minutes(minutes)
}

/// Formats hours as a two-decimal number, e.g. `"8.50"`.
pub fn format_decimal_hours(hours: Decimal) -> String {
    let rounded = hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Formats an amount with the configured symbol, grouping and precision.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::format_currency;
/// use workforce_engine::config::CurrencyFormat;
/// use rust_decimal::Decimal;
///
/// let usd = CurrencyFormat::default();
/// assert_eq!(format_currency(Decimal::new(12345, 1), &usd), "$1,234.50");
/// assert_eq!(format_currency(Decimal::new(-5, 0), &usd), "-$5.00");
/// ```
pub fn format_currency(amount: Decimal, format: &CurrencyFormat) -> String {
    let rounded = amount
        .round_dp_with_strategy(format.decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", format.decimal_places as usize, rounded.abs());

    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push_str(&format.thousands_separator);
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&format.symbol);
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
