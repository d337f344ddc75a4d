//! Check-in and check-out.

use std::sync::Arc;

use chrono::{DateTime, Days, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::local_date;
use crate::backend::{Backend, Order, Query, decode_row, decode_rows, encode_row, tables};
use crate::calculation::month_bounds;
use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::AttendanceRecord;

/// Check-in and check-out recording.
pub struct AttendanceService {
    backend: Arc<dyn Backend>,
    policy: Arc<PolicyConfig>,
}

impl AttendanceService {
    /// Creates the service.
    pub fn new(backend: Arc<dyn Backend>, policy: Arc<PolicyConfig>) -> Self {
        Self { backend, policy }
    }

    /// Opens an attendance record for the office-local date of `at`.
    ///
    /// # Errors
    ///
    /// `AlreadyCheckedIn` if the employee already has an open record for
    /// that date.
    pub async fn check_in(
        &self,
        employee_id: &str,
        at: DateTime<Utc>,
    ) -> EngineResult<AttendanceRecord> {
        let date = local_date(at, self.policy.utc_offset_minutes);
        let existing: Vec<AttendanceRecord> = decode_rows(
            tables::ATTENDANCE,
            self.backend
                .select(
                    tables::ATTENDANCE,
                    &Query::new()
                        .eq("employee_id", employee_id)
                        .eq("date", date.to_string()),
                )
                .await?,
        )?;
        if existing.iter().any(AttendanceRecord::is_open) {
            warn!(employee_id, %date, "Duplicate check-in rejected");
            return Err(EngineError::AlreadyCheckedIn {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            date,
            check_in: at,
            check_out: None,
            notes: None,
        };
        let row = self
            .backend
            .insert(tables::ATTENDANCE, encode_row(tables::ATTENDANCE, &record)?)
            .await?;
        info!(employee_id, %date, record_id = %record.id, "Checked in");
        decode_row(tables::ATTENDANCE, row)
    }

    /// Closes the employee's most recent open record.
    ///
    /// Records from the previous local date are considered too, so a shift
    /// crossing midnight can be closed.
    ///
    /// # Errors
    ///
    /// `NotCheckedIn` if there is no open record; `InvalidAttendance` if
    /// `at` is before the check-in.
    pub async fn check_out(
        &self,
        employee_id: &str,
        at: DateTime<Utc>,
    ) -> EngineResult<AttendanceRecord> {
        let date = local_date(at, self.policy.utc_offset_minutes);
        let since = date.checked_sub_days(Days::new(1)).unwrap_or(date);
        let candidates: Vec<AttendanceRecord> = decode_rows(
            tables::ATTENDANCE,
            self.backend
                .select(
                    tables::ATTENDANCE,
                    &Query::new()
                        .eq("employee_id", employee_id)
                        .gte("date", since.to_string())
                        .lte("date", date.to_string())
                        .order_by("check_in", Order::Desc),
                )
                .await?,
        )?;

        let open = candidates
            .into_iter()
            .find(AttendanceRecord::is_open)
            .ok_or_else(|| EngineError::NotCheckedIn {
                employee_id: employee_id.to_string(),
                date,
            })?;
        if at < open.check_in {
            return Err(EngineError::InvalidAttendance {
                record_id: open.id.clone(),
                message: format!(
                    "check-out {} is before check-in {}",
                    at.to_rfc3339(),
                    open.check_in.to_rfc3339()
                ),
            });
        }

        let updated = self
            .backend
            .update(
                tables::ATTENDANCE,
                &Query::new().eq("id", open.id.as_str()),
                json!({"check_out": at}),
            )
            .await?;
        let row = updated.into_iter().next().ok_or_else(|| EngineError::NotFound {
            entity: "attendance".to_string(),
            id: open.id.clone(),
        })?;
        info!(employee_id, record_id = %open.id, "Checked out");
        decode_row(tables::ATTENDANCE, row)
    }

    /// An employee's records for a month, oldest first.
    pub async fn records_for_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let (first, last) = month_bounds(year, month)?;
        let rows = self
            .backend
            .select(
                tables::ATTENDANCE,
                &Query::new()
                    .eq("employee_id", employee_id)
                    .gte("date", first.to_string())
                    .lte("date", last.to_string())
                    .order_by("check_in", Order::Asc),
            )
            .await?;
        decode_rows(tables::ATTENDANCE, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use chrono::{NaiveDate, TimeZone};

    fn service() -> AttendanceService {
        AttendanceService::new(
            Arc::new(InMemoryBackend::new()),
            Arc::new(PolicyConfig::default()),
        )
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_check_in_then_out() {
        let svc = service();
        let record = svc.check_in("emp_001", at(2, 9, 0)).await.unwrap();
        assert!(record.is_open());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());

        let closed = svc.check_out("emp_001", at(2, 17, 30)).await.unwrap();
        assert_eq!(closed.id, record.id);
        assert_eq!(closed.check_out, Some(at(2, 17, 30)));
    }

    #[tokio::test]
    async fn test_second_open_check_in_rejected() {
        let svc = service();
        svc.check_in("emp_001", at(2, 9, 0)).await.unwrap();
        let second = svc.check_in("emp_001", at(2, 9, 5)).await;
        assert!(matches!(second, Err(EngineError::AlreadyCheckedIn { .. })));

        // Another employee is unaffected.
        assert!(svc.check_in("emp_002", at(2, 9, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_in_allowed_after_check_out() {
        let svc = service();
        svc.check_in("emp_001", at(2, 9, 0)).await.unwrap();
        svc.check_out("emp_001", at(2, 12, 0)).await.unwrap();
        assert!(svc.check_in("emp_001", at(2, 13, 0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_out_without_check_in() {
        let svc = service();
        let result = svc.check_out("emp_001", at(2, 17, 0)).await;
        assert!(matches!(result, Err(EngineError::NotCheckedIn { .. })));
    }

    #[tokio::test]
    async fn test_check_out_before_check_in_rejected() {
        let svc = service();
        svc.check_in("emp_001", at(2, 9, 0)).await.unwrap();
        let result = svc.check_out("emp_001", at(2, 8, 0)).await;
        assert!(matches!(result, Err(EngineError::InvalidAttendance { .. })));
    }

    #[tokio::test]
    async fn test_overnight_check_out() {
        let svc = service();
        let record = svc.check_in("emp_001", at(2, 22, 0)).await.unwrap();
        let closed = svc.check_out("emp_001", at(3, 6, 0)).await.unwrap();
        assert_eq!(closed.id, record.id);
        assert_eq!(closed.date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[tokio::test]
    async fn test_records_for_month_sorted_and_scoped() {
        let svc = service();
        for day in [4, 2, 3] {
            svc.check_in("emp_001", at(day, 9, 0)).await.unwrap();
            svc.check_out("emp_001", at(day, 17, 0)).await.unwrap();
        }
        svc.check_in("emp_002", at(2, 9, 0)).await.unwrap();

        let records = svc.records_for_month("emp_001", 2026, 3).await.unwrap();
        let days: Vec<u32> = records.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![2, 3, 4]);
        assert!(svc.records_for_month("emp_001", 2026, 4).await.unwrap().is_empty());
    }
}
