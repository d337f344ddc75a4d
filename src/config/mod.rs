//! Configuration loading and management for the Workforce Engine.
//!
//! This module loads the attendance policy, backend connection settings and
//! holiday calendars from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use workforce_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Office opens at {}", config.policy().office_start);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BackendConfig, CurrencyFormat, EngineConfig, HolidayCalendar, PolicyConfig};
