//! HTTP request handlers for the Workforce Engine API.
//!
//! This module contains the handler functions for all API endpoints. The
//! handlers are thin: they parse the body, call the calculation layer and
//! map errors to [`ApiError`] bodies.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    break_duration_minutes_iso, compute_salary_record, find_break_conflicts, format_currency,
    format_minutes, summarize_month,
};
use crate::error::EngineError;
use crate::models::BreakRequest;

use super::request::{BreakConflictRequest, BreakDurationRequest, MonthlyRequest};
use super::response::{
    ApiError, ApiErrorResponse, BreakConflictResponse, BreakDurationResponse, FormattedSalary,
    SalaryCalculationResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/breaks/duration", post(break_duration_handler))
        .route("/breaks/conflicts", post(break_conflicts_handler))
        .route("/attendance/summary", post(attendance_summary_handler))
        .route("/salary/calculate", post(salary_calculate_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body extraction failure to a 400 with an [`ApiError`] body.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn engine_error_response(err: EngineError, correlation_id: Uuid) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Handler for POST /breaks/duration.
///
/// Returns the break length in minutes and as a display string.
async fn break_duration_handler(
    payload: Result<Json<BreakDurationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match break_duration_minutes_iso(&request.start, &request.end) {
        Ok(minutes) => {
            info!(correlation_id = %correlation_id, minutes, "Break duration calculated");
            json_response(
                StatusCode::OK,
                BreakDurationResponse {
                    minutes,
                    formatted: format_minutes(minutes),
                },
            )
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /breaks/conflicts.
///
/// Lists the existing breaks that collide with the candidate.
async fn break_conflicts_handler(
    payload: Result<Json<BreakConflictRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match find_break_conflicts(&request.candidate, &request.existing) {
        Ok(found) => {
            let conflicts: Vec<BreakRequest> = found.into_iter().cloned().collect();
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.candidate.employee_id,
                existing = request.existing.len(),
                conflicts = conflicts.len(),
                "Break conflicts checked"
            );
            json_response(
                StatusCode::OK,
                BreakConflictResponse {
                    has_conflict: !conflicts.is_empty(),
                    conflicts,
                },
            )
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /attendance/summary.
async fn attendance_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance summary request");
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let (year, month, now) = (request.year, request.month, request.now);
    let config = state.config();
    let (employee, activity) = request.into_parts(config.holidays_in_month(year, month));

    match summarize_month(&employee, year, month, &activity, config.policy(), now) {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                present_days = summary.present_days,
                working_days = summary.working_days,
                duration_us = start_time.elapsed().as_micros(),
                "Attendance summary completed"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}

/// Handler for POST /salary/calculate.
///
/// Summarises the month and derives the salary record from it.
async fn salary_calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary calculation request");
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    let (year, month, now) = (request.year, request.month, request.now);
    let config = state.config();
    let policy = config.policy();
    let (employee, activity) = request.into_parts(config.holidays_in_month(year, month));

    let result = summarize_month(&employee, year, month, &activity, policy, now).and_then(
        |summary| {
            let salary = compute_salary_record(&summary, &employee, policy)?;
            Ok((summary, salary))
        },
    );

    match result {
        Ok((summary, salary)) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                prorated_salary = %salary.prorated_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Salary calculation completed"
            );
            let formatted = FormattedSalary {
                prorated_salary: format_currency(salary.prorated_salary, &policy.currency),
                hours_based_earnings: format_currency(salary.hours_based_earnings, &policy.currency),
                hours_worked: format_minutes(summary.total_worked_minutes),
            };
            json_response(
                StatusCode::OK,
                SalaryCalculationResponse {
                    summary,
                    salary,
                    formatted,
                },
            )
        }
        Err(err) => engine_error_response(err, correlation_id),
    }
}
