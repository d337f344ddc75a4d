//! Persistence seam for the Workforce Engine.
//!
//! The hosted service is a PostgREST-style database exposing table CRUD
//! and a few named procedures. Services talk to it only through the
//! [`Backend`] trait, so the workflows run unchanged against the
//! [`InMemoryBackend`] in tests.

mod memory;
pub mod procedures;
mod query;
mod rest;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

pub use memory::InMemoryBackend;
pub use query::{Filter, FilterOp, Order, Query};
pub use rest::{RestBackend, RetryPolicy};

/// Table names used by the engine.
pub mod tables {
    /// Employee profiles.
    pub const EMPLOYEES: &str = "employees";
    /// Daily check-in/check-out records.
    pub const ATTENDANCE: &str = "attendance";
    /// Break requests and HR-assigned breaks.
    pub const BREAK_REQUESTS: &str = "break_requests";
    /// Leave requests.
    pub const LEAVE_REQUESTS: &str = "leave_requests";
    /// Company holidays.
    pub const HOLIDAYS: &str = "holidays";
    /// Scheduled base salary changes.
    pub const SALARY_CHANGES: &str = "salary_changes";
    /// Generated monthly salary records.
    pub const SALARY_RECORDS: &str = "salary_records";

    /// Every table, for backends that validate names.
    pub const ALL: [&str; 7] = [
        EMPLOYEES,
        ATTENDANCE,
        BREAK_REQUESTS,
        LEAVE_REQUESTS,
        HOLIDAYS,
        SALARY_CHANGES,
        SALARY_RECORDS,
    ];
}

/// Row storage and remote procedures.
///
/// Rows are JSON objects. `insert` and `update` return the stored rows
/// as the backend sees them, including generated ids.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn backend_tag(&self) -> &'static str;

    /// Returns the rows matching the query.
    async fn select(&self, table: &str, query: &Query) -> EngineResult<Vec<Value>>;

    /// Inserts one row and returns it.
    async fn insert(&self, table: &str, row: Value) -> EngineResult<Value>;

    /// Merges `patch` into every matching row and returns the updated rows.
    async fn update(&self, table: &str, query: &Query, patch: Value) -> EngineResult<Vec<Value>>;

    /// Deletes the matching rows and returns how many were removed.
    async fn delete(&self, table: &str, query: &Query) -> EngineResult<u64>;

    /// Calls a named procedure.
    async fn rpc(&self, procedure: &str, args: Value) -> EngineResult<Value>;
}

/// Decodes backend rows into a model type.
pub fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> EngineResult<Vec<T>> {
    rows.into_iter().map(|row| decode_row(table, row)).collect()
}

/// Decodes a single backend row.
pub fn decode_row<T: DeserializeOwned>(table: &str, row: Value) -> EngineResult<T> {
    serde_json::from_value(row)
        .map_err(|e| EngineError::backend(table, format!("unexpected row shape: {}", e)))
}

/// Encodes a model as a backend row.
pub fn encode_row<T: Serialize>(table: &str, value: &T) -> EngineResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| EngineError::backend(table, format!("could not encode row: {}", e)))
}
