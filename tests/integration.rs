//! Integration tests for the Workforce Engine HTTP API.
//!
//! These tests drive the router end to end with the default configuration:
//! - Break duration and formatting
//! - Break conflict detection
//! - Monthly attendance summaries, including configured holidays
//! - Salary calculation and currency formatting
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use workforce_engine::api::{AppState, create_router};
use workforce_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    create_router(AppState::new(config))
}

async fn post_raw(uri: &str, body: String) -> (StatusCode, Value) {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(uri, body.to_string()).await
}

fn attendance(id: &str, date: &str, check_in: &str, check_out: Option<&str>) -> Value {
    json!({
        "id": id,
        "employee_id": "emp_001",
        "date": date,
        "check_in": format!("{}T{}Z", date, check_in),
        "check_out": check_out.map(|t| format!("{}T{}Z", date, t)),
    })
}

fn break_request(id: &str, date: &str, start: &str, end: &str, status: &str) -> Value {
    json!({
        "id": id,
        "employee_id": "emp_001",
        "date": date,
        "break_type": "lunch",
        "requested_start": format!("{}T{}Z", date, start),
        "requested_end": format!("{}T{}Z", date, end),
        "status": status,
    })
}

/// Two days in March 2026: one on time with a 30 minute approved lunch,
/// one late with no break.
fn march_request() -> Value {
    json!({
        "employee": {"id": "emp_001", "full_name": "Sam Carter", "base_salary": "3520.00"},
        "year": 2026,
        "month": 3,
        "attendance": [
            attendance("att_1", "2026-03-02", "09:00:00", Some("17:00:00")),
            attendance("att_2", "2026-03-03", "09:20:00", Some("17:20:00")),
        ],
        "breaks": [
            break_request("brk_1", "2026-03-02", "12:00:00", "12:30:00", "approved"),
            break_request("brk_2", "2026-03-03", "12:00:00", "13:00:00", "rejected"),
        ],
    })
}

// =============================================================================
// Break Duration
// =============================================================================

#[tokio::test]
async fn test_break_duration() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": "2026-03-02T12:00:00Z", "end": "2026-03-02T13:15:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minutes"], 75);
    assert_eq!(body["formatted"], "1h 15m");
}

#[tokio::test]
async fn test_break_duration_accepts_offsets() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": "2026-03-02T12:00:00+05:30", "end": "2026-03-02T06:45:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minutes"], 15);
    assert_eq!(body["formatted"], "15m");
}

#[tokio::test]
async fn test_break_duration_zero_length() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": "2026-03-02T12:00:00Z", "end": "2026-03-02T12:00:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["minutes"], 0);
    assert_eq!(body["formatted"], "0m");
}

#[tokio::test]
async fn test_break_duration_end_before_start() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": "2026-03-02T13:00:00Z", "end": "2026-03-02T12:00:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BREAK");
}

#[tokio::test]
async fn test_break_duration_bad_timestamp() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": "noon", "end": "2026-03-02T12:00:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TIMESTAMP");
}

// =============================================================================
// Break Conflicts
// =============================================================================

#[tokio::test]
async fn test_break_conflicts_found() {
    let (status, body) = post(
        "/breaks/conflicts",
        json!({
            "candidate": break_request("new", "2026-03-02", "12:15:00", "12:45:00", "pending"),
            "existing": [
                break_request("brk_1", "2026-03-02", "12:00:00", "12:30:00", "approved"),
                break_request("brk_2", "2026-03-02", "12:30:00", "13:00:00", "rejected"),
                break_request("brk_3", "2026-03-02", "12:45:00", "13:00:00", "pending"),
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_conflict"], true);
    let conflicts = body["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["id"], "brk_1");
}

#[tokio::test]
async fn test_break_conflicts_none() {
    let (status, body) = post(
        "/breaks/conflicts",
        json!({
            "candidate": break_request("new", "2026-03-02", "15:00:00", "15:15:00", "pending"),
            "existing": [
                break_request("brk_1", "2026-03-02", "12:00:00", "12:30:00", "approved"),
            ],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_conflict"], false);
    assert!(body["conflicts"].as_array().unwrap().is_empty());
}

// =============================================================================
// Attendance Summary
// =============================================================================

#[tokio::test]
async fn test_attendance_summary() {
    let (status, body) = post("/attendance/summary", march_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], "emp_001");
    assert_eq!(body["working_days"], 22);
    assert_eq!(body["present_days"], 2);
    assert_eq!(body["absent_days"], 20);
    assert_eq!(body["late_days"], 1);
    assert_eq!(body["total_worked_minutes"], 930);
    assert_eq!(body["total_break_minutes"], 30);
    assert_eq!(body["attendance_percentage"], "9.09");
}

#[tokio::test]
async fn test_attendance_summary_uses_configured_holidays() {
    let (status, body) = post(
        "/attendance/summary",
        json!({
            "employee": {"id": "emp_001", "base_salary": "3000"},
            "year": 2026,
            "month": 12,
        }),
    )
    .await;

    // 23 weekdays, less Christmas Day; Boxing Day falls on a Saturday.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["working_days"], 22);
    assert_eq!(body["present_days"], 0);
}

#[tokio::test]
async fn test_attendance_summary_counts_leave() {
    let mut request = march_request();
    request["leaves"] = json!([
        {
            "id": "lv_1",
            "employee_id": "emp_001",
            "leave_type": "annual",
            "start_date": "2026-03-04",
            "end_date": "2026-03-05",
            "status": "approved",
        },
        {
            "id": "lv_2",
            "employee_id": "emp_001",
            "leave_type": "unpaid",
            "start_date": "2026-03-06",
            "end_date": "2026-03-06",
            "status": "approved",
        },
    ]);

    let (status, body) = post("/attendance/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid_leave_days"], 2);
    assert_eq!(body["unpaid_leave_days"], 1);
    assert_eq!(body["absent_days"], 17);
}

#[tokio::test]
async fn test_attendance_summary_invalid_month() {
    let mut request = march_request();
    request["month"] = json!(13);

    let (status, body) = post("/attendance/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD");
}

// =============================================================================
// Salary Calculation
// =============================================================================

#[tokio::test]
async fn test_salary_calculation() {
    let (status, body) = post("/salary/calculate", march_request()).await;

    assert_eq!(status, StatusCode::OK);
    let salary = &body["salary"];
    assert_eq!(salary["working_days"], 22);
    assert_eq!(salary["present_days"], 2);
    assert_eq!(salary["hourly_rate"], "20.00");
    assert_eq!(salary["prorated_salary"], "320.00");
    assert_eq!(salary["hours_worked"], "15.50");
    assert_eq!(salary["hours_based_earnings"], "310.00");
    assert_eq!(salary["break_minutes"], 30);

    assert_eq!(body["summary"]["late_days"], 1);
    assert_eq!(body["formatted"]["prorated_salary"], "$320.00");
    assert_eq!(body["formatted"]["hours_based_earnings"], "$310.00");
    assert_eq!(body["formatted"]["hours_worked"], "15h 30m");
}

#[tokio::test]
async fn test_salary_open_record_needs_reference_time() {
    let mut request = march_request();
    request["attendance"] = json!([attendance("att_1", "2026-03-02", "09:00:00", None)]);

    let (status, body) = post("/salary/calculate", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_worked_minutes"], 0);
    assert_eq!(body["salary"]["prorated_salary"], "0.00");

    request["now"] = json!("2026-03-02T11:00:00Z");
    let (status, body) = post("/salary/calculate", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_worked_minutes"], 120);
    assert_eq!(body["summary"]["present_days"], 0);
}

#[tokio::test]
async fn test_salary_negative_base_rejected() {
    let mut request = march_request();
    request["employee"]["base_salary"] = json!("-100");

    let (status, body) = post("/salary/calculate", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_SALARY_INPUT");
}

// =============================================================================
// Request Errors
// =============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = post_raw("/salary/calculate", "{ not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field() {
    let (status, body) = post("/attendance/summary", json!({"year": 2026, "month": 3})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("employee"));
}

#[tokio::test]
async fn test_wrong_field_type() {
    let (status, body) = post(
        "/breaks/duration",
        json!({"start": 1200, "end": "2026-03-02T12:00:00Z"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}
