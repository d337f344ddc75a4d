//! Configuration types for the Workforce Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Holiday, LeaveType, default_working_days};

/// How monetary amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount (e.g. "$").
    pub symbol: String,
    /// Number of digits after the decimal point.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Separator inserted between groups of three integer digits.
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

/// Attendance and salary policy from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyConfig {
    /// Expected hours in a full working day.
    pub standard_daily_hours: Decimal,
    /// Local time the working day starts.
    pub office_start: NaiveTime,
    /// Minutes after `office_start` before a check-in counts as late.
    #[serde(default)]
    pub late_grace_minutes: i64,
    /// Offset of the office's local time from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Working week applied to employees without their own.
    #[serde(default = "default_working_days")]
    pub default_working_days: Vec<Weekday>,
    /// Currency rendering.
    #[serde(default)]
    pub currency: CurrencyFormat,
    /// Leave types that count as paid days.
    #[serde(default = "default_paid_leave_types")]
    pub paid_leave_types: Vec<LeaveType>,
}

fn default_paid_leave_types() -> Vec<LeaveType> {
    vec![LeaveType::Sick, LeaveType::Casual, LeaveType::Annual]
}

impl PolicyConfig {
    /// True if approved leave of this type is paid.
    pub fn is_paid_leave(&self, leave_type: LeaveType) -> bool {
        self.paid_leave_types.contains(&leave_type)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            standard_daily_hours: Decimal::from(8),
            office_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            late_grace_minutes: 15,
            utc_offset_minutes: 0,
            default_working_days: default_working_days(),
            currency: CurrencyFormat::default(),
            paid_leave_types: default_paid_leave_types(),
        }
    }
}

/// Connection settings for the hosted backend from `backend.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://project.example.co`.
    pub base_url: String,
    /// Anonymous or service API key sent with every request.
    pub api_key: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per request before giving up on transport failures.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Base backoff between attempts; multiplied by the attempt number.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> usize {
    3
}

fn default_backoff_ms() -> u64 {
    200
}

/// One holiday calendar file under `holidays/`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// The calendar year.
    pub year: i32,
    /// Holidays in that year.
    pub holidays: Vec<Holiday>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    policy: PolicyConfig,
    backend: Option<BackendConfig>,
    /// Sorted by date, duplicates removed.
    holidays: Vec<Holiday>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        policy: PolicyConfig,
        backend: Option<BackendConfig>,
        holidays: Vec<Holiday>,
    ) -> Self {
        let mut sorted = holidays;
        sorted.sort_by(|a, b| a.date.cmp(&b.date));
        sorted.dedup_by(|a, b| a.date == b.date);
        Self {
            policy,
            backend,
            holidays: sorted,
        }
    }

    /// Returns the attendance and salary policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns the backend settings, if a `backend.yaml` was present.
    pub fn backend(&self) -> Option<&BackendConfig> {
        self.backend.as_ref()
    }

    /// Returns all holidays, oldest first.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(PolicyConfig::default(), None, Vec::new())
    }
}
