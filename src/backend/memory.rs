//! In-memory backend for tests and local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::procedures::{
    APPLY_PENDING_SALARY_CHANGES, CREATE_EMPLOYEE_WITH_AUTH, DELETE_EMPLOYEE_CASCADE,
    GET_MONTHLY_WORKING_DAYS,
};
use super::{Backend, Order, Query, decode_row, decode_rows, encode_row, tables};
use crate::calculation::count_working_days;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, Holiday, NewEmployee, SalaryChange};

const MIN_PASSWORD_LEN: usize = 6;

type Tables = HashMap<String, Vec<Value>>;

/// Backend holding every table in memory.
///
/// Emulates the hosted procedures so services can be exercised without a
/// network. Ids are generated for rows inserted without one.
#[derive(Default)]
pub struct InMemoryBackend {
    store: Mutex<Tables>,
    /// Login e-mails registered through `create_employee_with_auth`.
    logins: Mutex<HashMap<String, String>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts rows directly, bypassing id generation.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) -> EngineResult<()> {
        check_table(table)?;
        self.store
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        Ok(())
    }

    /// Number of rows currently stored in a table.
    pub async fn row_count(&self, table: &str) -> usize {
        self.store.lock().await.get(table).map_or(0, Vec::len)
    }
}

fn check_table(table: &str) -> EngineResult<()> {
    if tables::ALL.contains(&table) {
        Ok(())
    } else {
        Err(EngineError::backend(table, "unknown table"))
    }
}

fn select_rows(store: &Tables, table: &str, query: &Query) -> Vec<Value> {
    let mut rows: Vec<Value> = store
        .get(table)
        .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
        .unwrap_or_default();
    query.sort(&mut rows);
    rows
}

fn insert_row(store: &mut Tables, table: &str, row: Value) -> EngineResult<Value> {
    let Value::Object(mut fields) = row else {
        return Err(EngineError::backend(table, "row must be a JSON object"));
    };
    let needs_id = match fields.get("id") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if needs_id {
        fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    let row = Value::Object(fields);
    store.entry(table.to_string()).or_default().push(row.clone());
    Ok(row)
}

fn update_rows(store: &mut Tables, table: &str, query: &Query, patch: &Map<String, Value>) -> Vec<Value> {
    let Some(rows) = store.get_mut(table) else {
        return Vec::new();
    };
    let mut updated = Vec::new();
    for row in rows.iter_mut().filter(|r| query.matches(r)) {
        if let Value::Object(fields) = row {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        updated.push(row.clone());
    }
    updated
}

fn delete_rows(store: &mut Tables, table: &str, query: &Query) -> u64 {
    let Some(rows) = store.get_mut(table) else {
        return 0;
    };
    let before = rows.len();
    rows.retain(|r| !query.matches(r));
    (before - rows.len()) as u64
}

fn parse_args<T: for<'de> Deserialize<'de>>(procedure: &str, args: Value) -> EngineResult<T> {
    serde_json::from_value(args)
        .map_err(|e| EngineError::backend(procedure, format!("invalid arguments: {}", e)))
}

#[derive(Deserialize)]
struct WorkingDaysArgs {
    employee_id: String,
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct CreateEmployeeArgs {
    employee: NewEmployee,
    password: String,
}

#[derive(Deserialize)]
struct EmployeeIdArgs {
    employee_id: String,
}

#[derive(Deserialize)]
struct AsOfArgs {
    as_of: NaiveDate,
}

fn find_employee(store: &Tables, employee_id: &str) -> EngineResult<Employee> {
    let row = select_rows(store, tables::EMPLOYEES, &Query::new().eq("id", employee_id))
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::NotFound {
            entity: "employee".to_string(),
            id: employee_id.to_string(),
        })?;
    decode_row(tables::EMPLOYEES, row)
}

fn monthly_working_days(store: &Tables, args: WorkingDaysArgs) -> EngineResult<Value> {
    let employee = find_employee(store, &args.employee_id)?;
    let holidays: Vec<Holiday> = decode_rows(
        tables::HOLIDAYS,
        select_rows(store, tables::HOLIDAYS, &Query::new()),
    )?;
    let count = count_working_days(args.year, args.month, &employee.working_days, &holidays)?;
    Ok(json!(count))
}

fn create_employee(
    store: &mut Tables,
    logins: &mut HashMap<String, String>,
    args: CreateEmployeeArgs,
) -> EngineResult<Value> {
    let email = args.employee.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::backend(
            CREATE_EMPLOYEE_WITH_AUTH,
            format!("invalid e-mail address '{}'", args.employee.email),
        ));
    }
    if args.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::backend(
            CREATE_EMPLOYEE_WITH_AUTH,
            format!("password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    if logins.contains_key(&email) {
        return Err(EngineError::backend(
            CREATE_EMPLOYEE_WITH_AUTH,
            format!("a user with e-mail '{}' already exists", email),
        ));
    }

    let employee = Employee {
        id: Uuid::new_v4().to_string(),
        full_name: args.employee.full_name,
        email: email.clone(),
        role: args.employee.role,
        base_salary: args.employee.base_salary,
        working_days: args.employee.working_days,
        is_active: true,
    };
    let row = insert_row(store, tables::EMPLOYEES, encode_row(tables::EMPLOYEES, &employee)?)?;
    logins.insert(email, employee.id);
    Ok(row)
}

fn delete_employee(
    store: &mut Tables,
    logins: &mut HashMap<String, String>,
    args: EmployeeIdArgs,
) -> EngineResult<Value> {
    let employee = find_employee(store, &args.employee_id)?;
    let owned = Query::new().eq("employee_id", args.employee_id.as_str());
    for table in [
        tables::ATTENDANCE,
        tables::BREAK_REQUESTS,
        tables::LEAVE_REQUESTS,
        tables::SALARY_CHANGES,
        tables::SALARY_RECORDS,
    ] {
        delete_rows(store, table, &owned);
    }
    delete_rows(store, tables::EMPLOYEES, &Query::new().eq("id", args.employee_id.as_str()));
    logins.remove(&employee.email);
    Ok(Value::Null)
}

fn apply_salary_changes(store: &mut Tables, args: AsOfArgs) -> EngineResult<Value> {
    let due = Query::new()
        .eq("applied", false)
        .lte("effective_date", args.as_of.to_string())
        .order_by("effective_date", Order::Asc);
    let pending = select_rows(store, tables::SALARY_CHANGES, &due);

    let mut applied = 0u32;
    for row in pending {
        let change: SalaryChange = decode_row(tables::SALARY_CHANGES, row)?;
        let salary = encode_row(tables::EMPLOYEES, &change.new_base_salary)?;

        let patch = Map::from_iter([("base_salary".to_string(), salary)]);
        let updated = update_rows(
            store,
            tables::EMPLOYEES,
            &Query::new().eq("id", change.employee_id.as_str()),
            &patch,
        );
        if updated.is_empty() {
            debug!(employee_id = %change.employee_id, "salary change for unknown employee skipped");
            continue;
        }

        let mark = Map::from_iter([("applied".to_string(), Value::Bool(true))]);
        let this_change = Query::new()
            .eq("employee_id", change.employee_id.as_str())
            .eq("effective_date", change.effective_date.to_string())
            .eq("applied", false);
        update_rows(store, tables::SALARY_CHANGES, &this_change, &mark);
        applied += 1;
    }
    Ok(json!(applied))
}

#[async_trait]
impl Backend for InMemoryBackend {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, table: &str, query: &Query) -> EngineResult<Vec<Value>> {
        check_table(table)?;
        Ok(select_rows(&*self.store.lock().await, table, query))
    }

    async fn insert(&self, table: &str, row: Value) -> EngineResult<Value> {
        check_table(table)?;
        insert_row(&mut *self.store.lock().await, table, row)
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> EngineResult<Vec<Value>> {
        check_table(table)?;
        let Value::Object(patch) = patch else {
            return Err(EngineError::backend(table, "patch must be a JSON object"));
        };
        Ok(update_rows(&mut *self.store.lock().await, table, query, &patch))
    }

    async fn delete(&self, table: &str, query: &Query) -> EngineResult<u64> {
        check_table(table)?;
        Ok(delete_rows(&mut *self.store.lock().await, table, query))
    }

    async fn rpc(&self, procedure: &str, args: Value) -> EngineResult<Value> {
        debug!(procedure, "in-memory procedure call");
        match procedure {
            GET_MONTHLY_WORKING_DAYS => {
                let args = parse_args(procedure, args)?;
                monthly_working_days(&*self.store.lock().await, args)
            }
            CREATE_EMPLOYEE_WITH_AUTH => {
                let args = parse_args(procedure, args)?;
                let mut store = self.store.lock().await;
                let mut logins = self.logins.lock().await;
                create_employee(&mut store, &mut logins, args)
            }
            DELETE_EMPLOYEE_CASCADE => {
                let args = parse_args(procedure, args)?;
                let mut store = self.store.lock().await;
                let mut logins = self.logins.lock().await;
                delete_employee(&mut store, &mut logins, args)
            }
            APPLY_PENDING_SALARY_CHANGES => {
                let args = parse_args(procedure, args)?;
                apply_salary_changes(&mut *self.store.lock().await, args)
            }
            other => Err(EngineError::backend(other, "unknown procedure")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_generates_id() {
        let backend = InMemoryBackend::new();
        let row = backend
            .insert(tables::HOLIDAYS, json!({"date": "2026-01-01", "name": "New Year"}))
            .await
            .unwrap();
        assert!(row["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(backend.row_count(tables::HOLIDAYS).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_table_rejected() {
        let backend = InMemoryBackend::new();
        let result = backend.select("payroll", &Query::new()).await;
        assert!(matches!(result, Err(EngineError::Backend { .. })));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let backend = InMemoryBackend::new();
        backend
            .seed(tables::LEAVE_REQUESTS, vec![json!({"id": "lv_1", "status": "pending"})])
            .await
            .unwrap();
        let updated = backend
            .update(
                tables::LEAVE_REQUESTS,
                &Query::new().eq("id", "lv_1"),
                json!({"status": "approved"}),
            )
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "approved");
    }

    #[tokio::test]
    async fn test_delete_counts_rows() {
        let backend = InMemoryBackend::new();
        backend
            .seed(
                tables::ATTENDANCE,
                vec![
                    json!({"id": "a", "employee_id": "emp_001"}),
                    json!({"id": "b", "employee_id": "emp_002"}),
                ],
            )
            .await
            .unwrap();
        let removed = backend
            .delete(tables::ATTENDANCE, &Query::new().eq("employee_id", "emp_001"))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(backend.row_count(tables::ATTENDANCE).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_procedure() {
        let backend = InMemoryBackend::new();
        assert!(backend.rpc("drop_everything", json!({})).await.is_err());
    }
}
