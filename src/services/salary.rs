//! Monthly summaries, salary reports and salary changes.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::fetch_by_id;
use crate::backend::{Backend, Order, Query, decode_rows, encode_row, procedures, tables};
use crate::calculation::{
    MonthlyActivity, apply_percentage_increment, compute_salary_record, month_bounds,
    summarize_month,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, BreakRequest, Employee, Holiday, LeaveRequest, MonthlySummary,
    RequestStatus, SalaryChange, SalaryRecord,
};

/// Monthly summaries, salary reports and scheduled salary changes.
pub struct SalaryService {
    backend: Arc<dyn Backend>,
    config: Arc<EngineConfig>,
}

impl SalaryService {
    /// Creates the service.
    pub fn new(backend: Arc<dyn Backend>, config: Arc<EngineConfig>) -> Self {
        Self { backend, config }
    }

    /// Summarises an employee's month from stored rows.
    ///
    /// Open attendance records are not counted.
    pub async fn monthly_summary(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<MonthlySummary> {
        let employee: Employee =
            fetch_by_id(self.backend.as_ref(), tables::EMPLOYEES, "employee", employee_id).await?;
        self.summary_for(&employee, year, month).await
    }

    /// Computes and stores salary records for every active employee.
    ///
    /// Records for the same month are replaced, so a report can be
    /// regenerated after late corrections. Employees whose rows cannot be
    /// summarised, such as a check-out before its check-in or a month with
    /// no working days, are skipped with a warning.
    pub async fn generate_salary_report(
        &self,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<SalaryRecord>> {
        month_bounds(year, month)?;
        let employees: Vec<Employee> = decode_rows(
            tables::EMPLOYEES,
            self.backend
                .select(
                    tables::EMPLOYEES,
                    &Query::new()
                        .eq("is_active", true)
                        .order_by("full_name", Order::Asc),
                )
                .await?,
        )?;

        // Every record is computed before anything is written, so a failure
        // leaves the stored report untouched.
        let mut records = Vec::with_capacity(employees.len());
        for employee in &employees {
            let record = match self.record_for(employee, year, month).await {
                Ok(record) => record,
                Err(e) if e.is_client_error() => {
                    warn!(employee_id = %employee.id, error = %e, "Employee skipped in salary report");
                    continue;
                }
                Err(e) => return Err(e),
            };
            records.push(record);
        }

        for record in &records {
            let this_month = Query::new()
                .eq("employee_id", record.employee_id.as_str())
                .eq("year", year)
                .eq("month", month);
            self.backend.delete(tables::SALARY_RECORDS, &this_month).await?;
            self.backend
                .insert(tables::SALARY_RECORDS, encode_row(tables::SALARY_RECORDS, record)?)
                .await?;
        }

        info!(year, month, employees = records.len(), "Salary report generated");
        Ok(records)
    }

    /// Schedules a percentage raise (or cut) of an employee's current base
    /// salary from `effective_date`.
    pub async fn schedule_salary_change(
        &self,
        employee_id: &str,
        percentage: Decimal,
        effective_date: NaiveDate,
    ) -> EngineResult<SalaryChange> {
        let employee: Employee =
            fetch_by_id(self.backend.as_ref(), tables::EMPLOYEES, "employee", employee_id).await?;
        let change = SalaryChange {
            employee_id: employee.id.clone(),
            new_base_salary: apply_percentage_increment(employee.base_salary, percentage)?,
            effective_date,
            applied: false,
        };
        self.backend
            .insert(tables::SALARY_CHANGES, encode_row(tables::SALARY_CHANGES, &change)?)
            .await?;
        info!(
            employee_id,
            %percentage,
            new_base_salary = %change.new_base_salary,
            %effective_date,
            "Salary change scheduled"
        );
        Ok(change)
    }

    /// Applies due salary changes and returns how many were applied.
    pub async fn apply_pending_salary_changes(&self, as_of: NaiveDate) -> EngineResult<u32> {
        let applied = procedures::apply_pending_salary_changes(self.backend.as_ref(), as_of).await?;
        info!(%as_of, applied, "Pending salary changes applied");
        Ok(applied)
    }

    async fn record_for(
        &self,
        employee: &Employee,
        year: i32,
        month: u32,
    ) -> EngineResult<SalaryRecord> {
        let summary = self.summary_for(employee, year, month).await?;
        compute_salary_record(&summary, employee, self.config.policy())
    }

    async fn summary_for(
        &self,
        employee: &Employee,
        year: i32,
        month: u32,
    ) -> EngineResult<MonthlySummary> {
        let activity = self.load_activity(&employee.id, year, month).await?;
        summarize_month(employee, year, month, &activity, self.config.policy(), None)
    }

    async fn load_activity(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<MonthlyActivity> {
        let (first, last) = month_bounds(year, month)?;
        let dated = |column: &str| {
            Query::new()
                .eq("employee_id", employee_id)
                .gte(column, first.to_string())
                .lte(column, last.to_string())
        };

        let attendance: Vec<AttendanceRecord> = decode_rows(
            tables::ATTENDANCE,
            self.backend.select(tables::ATTENDANCE, &dated("date")).await?,
        )?;
        // One extra day catches breaks after midnight on the month's last night.
        let breaks: Vec<BreakRequest> = decode_rows(
            tables::BREAK_REQUESTS,
            self.backend
                .select(
                    tables::BREAK_REQUESTS,
                    &Query::new()
                        .eq("employee_id", employee_id)
                        .eq("status", RequestStatus::Approved.as_str())
                        .gte("date", first.to_string())
                        .lte("date", (last + Duration::days(1)).to_string()),
                )
                .await?,
        )?;
        let leaves: Vec<LeaveRequest> = decode_rows(
            tables::LEAVE_REQUESTS,
            self.backend
                .select(
                    tables::LEAVE_REQUESTS,
                    &Query::new()
                        .eq("employee_id", employee_id)
                        .eq("status", RequestStatus::Approved.as_str())
                        .lte("start_date", last.to_string())
                        .gte("end_date", first.to_string()),
                )
                .await?,
        )?;

        // Holidays come from configuration and from the holidays table.
        let mut holidays: Vec<Holiday> = decode_rows(
            tables::HOLIDAYS,
            self.backend
                .select(
                    tables::HOLIDAYS,
                    &Query::new()
                        .gte("date", first.to_string())
                        .lte("date", last.to_string()),
                )
                .await?,
        )?;
        holidays.extend(
            self.config
                .holidays()
                .iter()
                .filter(|h| h.date >= first && h.date <= last)
                .cloned(),
        );
        holidays.sort_by_key(|h| h.date);
        holidays.dedup_by_key(|h| h.date);

        Ok(MonthlyActivity {
            attendance,
            breaks,
            leaves,
            holidays,
        })
    }
}
