//! Leave requests and their review.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::fetch_by_id;
use crate::backend::{Backend, Query, decode_row, decode_rows, encode_row, tables};
use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveRequest, LeaveType, RequestStatus};

const ENTITY: &str = "leave";

/// A leave request as submitted by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeave {
    /// The employee requesting leave.
    pub employee_id: String,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave, inclusive.
    pub end_date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Leave requests and their review.
pub struct LeaveService {
    backend: Arc<dyn Backend>,
}

impl LeaveService {
    /// Creates the service.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Submits a pending leave request.
    ///
    /// # Errors
    ///
    /// `InvalidLeave` if the range is reversed; `LeaveConflict` if it
    /// shares a day with a pending or approved request.
    pub async fn request_leave(&self, new: NewLeave) -> EngineResult<LeaveRequest> {
        let request = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            employee_id: new.employee_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            status: RequestStatus::Pending,
            reason: new.reason,
        };
        request.validate()?;

        let active: Vec<LeaveRequest> = decode_rows(
            tables::LEAVE_REQUESTS,
            self.backend
                .select(
                    tables::LEAVE_REQUESTS,
                    &Query::new()
                        .eq("employee_id", request.employee_id.as_str())
                        .in_list(
                            "status",
                            [RequestStatus::Pending.as_str(), RequestStatus::Approved.as_str()],
                        )
                        .lte("start_date", request.end_date.to_string())
                        .gte("end_date", request.start_date.to_string()),
                )
                .await?,
        )?;
        if let Some(existing) = active.iter().find(|l| l.overlaps(&request)) {
            warn!(
                employee_id = %request.employee_id,
                existing_id = %existing.id,
                "Leave overlaps an existing request"
            );
            return Err(EngineError::LeaveConflict {
                start_date: existing.start_date,
                end_date: existing.end_date,
            });
        }

        let row = self
            .backend
            .insert(tables::LEAVE_REQUESTS, encode_row(tables::LEAVE_REQUESTS, &request)?)
            .await?;
        info!(
            leave_id = %request.id,
            employee_id = %request.employee_id,
            leave_type = ?request.leave_type,
            "Leave requested"
        );
        decode_row(tables::LEAVE_REQUESTS, row)
    }

    /// Approves a pending request.
    pub async fn approve_leave(&self, id: &str) -> EngineResult<LeaveRequest> {
        self.review(id, RequestStatus::Approved).await
    }

    /// Rejects a pending request.
    pub async fn reject_leave(&self, id: &str) -> EngineResult<LeaveRequest> {
        self.review(id, RequestStatus::Rejected).await
    }

    /// Approved leave of an employee touching the given date range.
    pub async fn approved_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<LeaveRequest>> {
        let rows = self
            .backend
            .select(
                tables::LEAVE_REQUESTS,
                &Query::new()
                    .eq("employee_id", employee_id)
                    .eq("status", RequestStatus::Approved.as_str())
                    .lte("start_date", to.to_string())
                    .gte("end_date", from.to_string()),
            )
            .await?;
        decode_rows(tables::LEAVE_REQUESTS, rows)
    }

    async fn review(&self, id: &str, to: RequestStatus) -> EngineResult<LeaveRequest> {
        let current: LeaveRequest =
            fetch_by_id(self.backend.as_ref(), tables::LEAVE_REQUESTS, ENTITY, id).await?;
        let status = current.status.transition(ENTITY, id, to)?;

        let row = self
            .backend
            .update(
                tables::LEAVE_REQUESTS,
                &Query::new().eq("id", id),
                json!({"status": status}),
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::NotFound {
                entity: ENTITY.to_string(),
                id: id.to_string(),
            })?;
        info!(leave_id = id, employee_id = %current.employee_id, status = %status, "Leave reviewed");
        decode_row(tables::LEAVE_REQUESTS, row)
    }
}
