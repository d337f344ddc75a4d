//! Core data models for the Workforce Engine.
//!
//! These are plain data transfer objects. The hosted backend owns their
//! lifecycle; the engine only holds request-scoped copies for arithmetic.

mod attendance;
mod break_request;
mod employee;
mod leave;
mod salary;
mod status;
mod time_range;

pub use attendance::AttendanceRecord;
pub use break_request::{BreakRequest, BreakSource, BreakType};
pub use employee::{Employee, NewEmployee, Role, default_working_days};
pub use leave::{Holiday, LeaveRequest, LeaveType};
pub use salary::{MonthlySummary, SalaryChange, SalaryRecord};
pub use status::RequestStatus;
pub use time_range::TimeRange;
