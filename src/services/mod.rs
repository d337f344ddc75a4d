//! Workflows over the backend.
//!
//! Each service validates a request with the calculation layer, checks the
//! stored state it depends on, and writes the result through a shared
//! [`Backend`]. Services hold no state of their own.

mod attendance;
mod breaks;
mod leave;
mod salary;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;

use crate::backend::{Backend, Query, decode_row};
use crate::error::{EngineError, EngineResult};

pub use attendance::AttendanceService;
pub use breaks::{BreakService, NewBreak};
pub use leave::{LeaveService, NewLeave};
pub use salary::SalaryService;

/// The office-local calendar date of an instant.
pub(crate) fn local_date(at: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    (at.naive_utc() + Duration::minutes(i64::from(utc_offset_minutes))).date()
}

/// Loads one row by id or fails with `NotFound`.
pub(crate) async fn fetch_by_id<T: DeserializeOwned>(
    backend: &dyn Backend,
    table: &str,
    entity: &str,
    id: &str,
) -> EngineResult<T> {
    let row = backend
        .select(table, &Query::new().eq("id", id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        })?;
    decode_row(table, row)
}
