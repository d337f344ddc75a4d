//! Response types for the Workforce Engine API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{BreakRequest, MonthlySummary, SalaryRecord};

/// Response body for `POST /breaks/duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakDurationResponse {
    /// Duration rounded to the nearest minute.
    pub minutes: i64,
    /// Human-readable duration, e.g. `"1h 15m"`.
    pub formatted: String,
}

/// Response body for `POST /breaks/conflicts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakConflictResponse {
    /// True if any existing break collides with the candidate.
    pub has_conflict: bool,
    /// The colliding breaks.
    pub conflicts: Vec<BreakRequest>,
}

/// Display strings for a salary record, using the configured currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedSalary {
    /// Pro-rated salary, e.g. `"$3,200.00"`.
    pub prorated_salary: String,
    /// Hours-based earnings.
    pub hours_based_earnings: String,
    /// Hours worked as a duration, e.g. `"144h 30m"`.
    pub hours_worked: String,
}

/// Response body for `POST /salary/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryCalculationResponse {
    /// The attendance summary the salary is based on.
    pub summary: MonthlySummary,
    /// The computed salary.
    pub salary: SalaryRecord,
    /// Display strings.
    pub formatted: FormattedSalary,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => "CONFIG_ERROR",
        EngineError::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
        EngineError::InvalidBreak { .. } => "INVALID_BREAK",
        EngineError::InvalidAttendance { .. } => "INVALID_ATTENDANCE",
        EngineError::InvalidLeave { .. } => "INVALID_LEAVE",
        EngineError::InvalidPeriod { .. } => "INVALID_PERIOD",
        EngineError::InvalidSalaryInput { .. } => "INVALID_SALARY_INPUT",
        EngineError::BreakConflict { .. } => "BREAK_CONFLICT",
        EngineError::LeaveConflict { .. } => "LEAVE_CONFLICT",
        EngineError::AlreadyCheckedIn { .. } => "ALREADY_CHECKED_IN",
        EngineError::NotCheckedIn { .. } => "NOT_CHECKED_IN",
        EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
        EngineError::NotFound { .. } => "NOT_FOUND",
        EngineError::Backend { .. } => "BACKEND_ERROR",
        EngineError::CalculationError { .. } => "CALCULATION_ERROR",
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error_code(&error);
        if error.is_client_error() {
            return ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(code, error.to_string()),
            };
        }

        // Server-side failures keep the cause in details only.
        let message = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "Configuration error"
            }
            EngineError::Backend { .. } => "Backend unavailable",
            _ => "Calculation failed",
        };
        ApiErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::with_details(code, message, error.to_string()),
        }
    }
}
