//! Employee model and related types.
//!
//! This module defines the Employee struct and Role enum for the people
//! whose attendance and salary the engine processes.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular staff member: records attendance, requests breaks and leave.
    #[default]
    Employee,
    /// HR staff: reviews requests and assigns breaks.
    Hr,
    /// Administrator: manages employees and salary reports.
    Admin,
}

impl Role {
    /// True for roles allowed to review requests and run reports.
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

/// Monday to Friday, the working week used when none is configured.
pub fn default_working_days() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

fn default_active() -> bool {
    true
}

/// Represents an employee as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Login e-mail address.
    pub email: String,
    /// Access role.
    #[serde(default)]
    pub role: Role,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Weekdays on which attendance is expected.
    #[serde(default = "default_working_days")]
    pub working_days: Vec<Weekday>,
    /// Whether the employee is currently employed.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Employee {
    /// Returns true if attendance is expected on the given weekday.
    ///
    /// # Examples
    ///
    /// ```
    /// use workforce_engine::models::{Employee, Role};
    /// use chrono::Weekday;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     full_name: "Sam Carter".to_string(),
    ///     email: "sam@example.com".to_string(),
    ///     role: Role::Employee,
    ///     base_salary: Decimal::new(300000, 2),
    ///     working_days: vec![Weekday::Mon, Weekday::Tue],
    ///     is_active: true,
    /// };
    /// assert!(employee.works_on(Weekday::Mon));
    /// assert!(!employee.works_on(Weekday::Sat));
    /// ```
    pub fn works_on(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }
}

/// Fields needed to create an employee together with a login identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Display name.
    pub full_name: String,
    /// Login e-mail address.
    pub email: String,
    /// Access role.
    #[serde(default)]
    pub role: Role,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Weekdays on which attendance is expected.
    #[serde(default = "default_working_days")]
    pub working_days: Vec<Weekday>,
}
