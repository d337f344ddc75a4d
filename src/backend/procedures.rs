//! Typed wrappers for the backend's named procedures.

use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::info;

use super::{Backend, decode_row, encode_row, tables};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, NewEmployee};

/// Working days of an employee in a month, holidays excluded.
pub const GET_MONTHLY_WORKING_DAYS: &str = "get_monthly_working_days";
/// Creates the login identity and the employee profile together.
pub const CREATE_EMPLOYEE_WITH_AUTH: &str = "create_employee_with_auth";
/// Deletes an employee and every row they own.
pub const DELETE_EMPLOYEE_CASCADE: &str = "delete_employee_cascade";
/// Applies scheduled salary changes that are due.
pub const APPLY_PENDING_SALARY_CHANGES: &str = "apply_pending_salary_changes";

fn expect_count(procedure: &str, value: Value) -> EngineResult<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| EngineError::backend(procedure, format!("expected a count, got {}", value)))
}

/// Returns the number of working days for an employee in a month.
pub async fn get_monthly_working_days(
    backend: &dyn Backend,
    employee_id: &str,
    year: i32,
    month: u32,
) -> EngineResult<u32> {
    let value = backend
        .rpc(
            GET_MONTHLY_WORKING_DAYS,
            json!({"employee_id": employee_id, "year": year, "month": month}),
        )
        .await?;
    expect_count(GET_MONTHLY_WORKING_DAYS, value)
}

/// Creates an employee with a login and returns the stored profile.
pub async fn create_employee_with_auth(
    backend: &dyn Backend,
    employee: &NewEmployee,
    password: &str,
) -> EngineResult<Employee> {
    let args = json!({
        "employee": encode_row(tables::EMPLOYEES, employee)?,
        "password": password,
    });
    let row = backend.rpc(CREATE_EMPLOYEE_WITH_AUTH, args).await?;
    let created: Employee = decode_row(tables::EMPLOYEES, row)?;
    info!(employee_id = %created.id, role = ?created.role, "employee created");
    Ok(created)
}

/// Deletes an employee together with their attendance, breaks, leave and
/// salary history.
pub async fn delete_employee_cascade(backend: &dyn Backend, employee_id: &str) -> EngineResult<()> {
    backend
        .rpc(DELETE_EMPLOYEE_CASCADE, json!({"employee_id": employee_id}))
        .await?;
    info!(employee_id, "employee deleted with owned rows");
    Ok(())
}

/// Applies every unapplied salary change effective on or before `as_of`
/// and returns how many were applied.
pub async fn apply_pending_salary_changes(
    backend: &dyn Backend,
    as_of: NaiveDate,
) -> EngineResult<u32> {
    let value = backend
        .rpc(APPLY_PENDING_SALARY_CHANGES, json!({"as_of": as_of}))
        .await?;
    expect_count(APPLY_PENDING_SALARY_CHANGES, value)
}
