//! HTTP API module for the Workforce Engine.
//!
//! This module provides REST endpoints over the calculation layer: break
//! durations, break conflict checks, monthly attendance summaries and
//! salary calculation.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BreakConflictRequest, BreakDurationRequest, EmployeeRequest, MonthlyRequest};
pub use response::{
    ApiError, BreakConflictResponse, BreakDurationResponse, FormattedSalary,
    SalaryCalculationResponse,
};
pub use state::AppState;
