//! Error types for the Workforce Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance,
//! reviewing requests and computing earnings. Every message is written to be
//! shown to the user as-is.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Workforce Engine.
///
/// # Example
///
/// ```
/// use workforce_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A timestamp string could not be parsed.
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp {
        /// The offending input.
        value: String,
        /// A description of the parse failure.
        message: String,
    },

    /// A break window was invalid.
    #[error("Invalid break: {message}")]
    InvalidBreak {
        /// A description of what made the break invalid.
        message: String,
    },

    /// An attendance record was invalid or incomplete.
    #[error("Invalid attendance record '{record_id}': {message}")]
    InvalidAttendance {
        /// The ID of the attendance record.
        record_id: String,
        /// A description of the problem.
        message: String,
    },

    /// A leave request was invalid.
    #[error("Invalid leave request: {message}")]
    InvalidLeave {
        /// A description of the problem.
        message: String,
    },

    /// A year/month pair did not describe a calendar month.
    #[error("Invalid period {year}-{month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// Salary inputs could not be used for a calculation.
    #[error("Invalid salary input '{field}': {message}")]
    InvalidSalaryInput {
        /// The field that was invalid.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A requested break overlaps one that is already pending or approved.
    #[error("Break overlaps {count} existing break(s) on {date}")]
    BreakConflict {
        /// The date of the requested break.
        date: NaiveDate,
        /// The number of conflicting breaks.
        count: usize,
    },

    /// A requested leave overlaps one that is already pending or approved.
    #[error("Leave overlaps an existing request from {start_date} to {end_date}")]
    LeaveConflict {
        /// Start of the conflicting leave.
        start_date: NaiveDate,
        /// End of the conflicting leave.
        end_date: NaiveDate,
    },

    /// The employee already has an open attendance record for the day.
    #[error("Employee '{employee_id}' is already checked in on {date}")]
    AlreadyCheckedIn {
        /// The employee.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// The employee has no open attendance record to close.
    #[error("Employee '{employee_id}' is not checked in on {date}")]
    NotCheckedIn {
        /// The employee.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// A request could not move from its current status to the requested one.
    #[error("Cannot move {entity} '{id}' from {from} to {to}")]
    InvalidTransition {
        /// The kind of request ("break", "leave").
        entity: String,
        /// The request ID.
        id: String,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// A row that was expected to exist was not returned by the backend.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of row.
        entity: String,
        /// The row ID.
        id: String,
    },

    /// The hosted backend rejected or failed a request.
    #[error("Backend error during {operation}: {message}")]
    Backend {
        /// The table or procedure being called.
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn backend(operation: impl Into<String>, message: impl ToString) -> Self {
        EngineError::Backend {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Returns true when the error was caused by caller input rather than
    /// configuration or the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::Backend { .. }
                | EngineError::CalculationError { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
