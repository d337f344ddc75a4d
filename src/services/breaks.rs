//! Break requests, HR-assigned breaks and their review.
//!
//! Every new or adjusted window is checked against the employee's pending
//! and approved breaks for the day.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use super::{fetch_by_id, local_date};
use crate::backend::{Backend, Order, Query, decode_row, decode_rows, encode_row, tables};
use crate::calculation::find_break_conflicts;
use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{BreakRequest, BreakSource, BreakType, RequestStatus, TimeRange};

const ENTITY: &str = "break";

/// A break to be requested or assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBreak {
    /// The employee taking the break.
    pub employee_id: String,
    /// The kind of break.
    #[serde(default)]
    pub break_type: BreakType,
    /// Start of the window.
    pub start: DateTime<Utc>,
    /// End of the window.
    pub end: DateTime<Utc>,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Break requests, HR assignment and review.
pub struct BreakService {
    backend: Arc<dyn Backend>,
    policy: Arc<PolicyConfig>,
}

impl BreakService {
    /// Creates the service.
    pub fn new(backend: Arc<dyn Backend>, policy: Arc<PolicyConfig>) -> Self {
        Self { backend, policy }
    }

    /// Submits a pending break request.
    ///
    /// # Errors
    ///
    /// `InvalidBreak` for a reversed or zero-length window; `BreakConflict`
    /// if it overlaps a pending or approved break on the same day.
    pub async fn request_break(&self, new: NewBreak) -> EngineResult<BreakRequest> {
        self.create(new, RequestStatus::Pending, BreakSource::Employee, None)
            .await
    }

    /// Records a break assigned by HR. Assigned breaks are approved on
    /// creation but are still checked for conflicts.
    pub async fn assign_break(
        &self,
        new: NewBreak,
        note: Option<String>,
    ) -> EngineResult<BreakRequest> {
        self.create(new, RequestStatus::Approved, BreakSource::HrAssigned, note)
            .await
    }

    /// Approves a pending break, optionally with a different window.
    pub async fn approve_break(
        &self,
        id: &str,
        adjusted: Option<TimeRange>,
        note: Option<String>,
    ) -> EngineResult<BreakRequest> {
        let current: BreakRequest =
            fetch_by_id(self.backend.as_ref(), tables::BREAK_REQUESTS, ENTITY, id).await?;
        let status = current.status.transition(ENTITY, id, RequestStatus::Approved)?;

        let mut patch = json!({"status": status, "reviewer_note": note});
        if let Some(window) = adjusted {
            ensure_not_empty(&window)?;
            let mut candidate = current.clone();
            candidate.approved_start = Some(window.start);
            candidate.approved_end = Some(window.end);
            self.ensure_no_conflicts(&candidate).await?;
            patch["approved_start"] = json!(window.start);
            patch["approved_end"] = json!(window.end);
        }

        let reviewed = self.patch(id, patch).await?;
        info!(break_id = id, employee_id = %reviewed.employee_id, adjusted = adjusted.is_some(), "Break approved");
        Ok(reviewed)
    }

    /// Rejects a pending break.
    pub async fn reject_break(&self, id: &str, note: Option<String>) -> EngineResult<BreakRequest> {
        let current: BreakRequest =
            fetch_by_id(self.backend.as_ref(), tables::BREAK_REQUESTS, ENTITY, id).await?;
        let status = current.status.transition(ENTITY, id, RequestStatus::Rejected)?;
        let reviewed = self
            .patch(id, json!({"status": status, "reviewer_note": note}))
            .await?;
        info!(break_id = id, employee_id = %reviewed.employee_id, "Break rejected");
        Ok(reviewed)
    }

    /// Withdraws a break that is still pending.
    pub async fn cancel_break(&self, id: &str) -> EngineResult<BreakRequest> {
        let current: BreakRequest =
            fetch_by_id(self.backend.as_ref(), tables::BREAK_REQUESTS, ENTITY, id).await?;
        let status = current.status.transition(ENTITY, id, RequestStatus::Cancelled)?;
        let cancelled = self.patch(id, json!({"status": status})).await?;
        info!(break_id = id, employee_id = %cancelled.employee_id, "Break cancelled");
        Ok(cancelled)
    }

    /// An employee's breaks for one date, in any status.
    pub async fn breaks_on(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Vec<BreakRequest>> {
        let rows = self
            .backend
            .select(
                tables::BREAK_REQUESTS,
                &Query::new()
                    .eq("employee_id", employee_id)
                    .eq("date", date.to_string())
                    .order_by("requested_start", Order::Asc),
            )
            .await?;
        decode_rows(tables::BREAK_REQUESTS, rows)
    }

    async fn create(
        &self,
        new: NewBreak,
        status: RequestStatus,
        source: BreakSource,
        reviewer_note: Option<String>,
    ) -> EngineResult<BreakRequest> {
        let window = TimeRange::new(new.start, new.end)?;
        ensure_not_empty(&window)?;

        let candidate = BreakRequest {
            id: Uuid::new_v4().to_string(),
            date: local_date(new.start, self.policy.utc_offset_minutes),
            employee_id: new.employee_id,
            break_type: new.break_type,
            requested_start: new.start,
            requested_end: new.end,
            approved_start: None,
            approved_end: None,
            status,
            source,
            reason: new.reason,
            reviewer_note,
        };
        self.ensure_no_conflicts(&candidate).await?;

        let row = self
            .backend
            .insert(
                tables::BREAK_REQUESTS,
                encode_row(tables::BREAK_REQUESTS, &candidate)?,
            )
            .await?;
        info!(
            break_id = %candidate.id,
            employee_id = %candidate.employee_id,
            source = ?source,
            status = %status,
            "Break recorded"
        );
        decode_row(tables::BREAK_REQUESTS, row)
    }

    async fn ensure_no_conflicts(&self, candidate: &BreakRequest) -> EngineResult<()> {
        let existing = self.breaks_on(&candidate.employee_id, candidate.date).await?;
        let conflicts = find_break_conflicts(candidate, &existing)?;
        if conflicts.is_empty() {
            return Ok(());
        }
        warn!(
            employee_id = %candidate.employee_id,
            date = %candidate.date,
            conflicts = conflicts.len(),
            "Break conflicts with existing breaks"
        );
        Err(EngineError::BreakConflict {
            date: candidate.date,
            count: conflicts.len(),
        })
    }

    async fn patch(&self, id: &str, patch: Value) -> EngineResult<BreakRequest> {
        let row = self
            .backend
            .update(tables::BREAK_REQUESTS, &Query::new().eq("id", id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::NotFound {
                entity: ENTITY.to_string(),
                id: id.to_string(),
            })?;
        decode_row(tables::BREAK_REQUESTS, row)
    }
}

fn ensure_not_empty(window: &TimeRange) -> EngineResult<()> {
    if window.is_empty() {
        return Err(EngineError::InvalidBreak {
            message: "break must end after it starts".to_string(),
        });
    }
    Ok(())
}
