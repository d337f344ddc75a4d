//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Holiday;

use super::types::{BackendConfig, EngineConfig, HolidayCalendar, PolicyConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml        # Working hours, lateness, currency, paid leave
/// ├── backend.yaml       # Hosted backend connection (optional)
/// └── holidays/
///     └── 2026.yaml      # Company holidays for one year (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Standard day: {}h", loader.policy().standard_daily_hours);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` is missing, or if any present file
    /// contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;

        let backend_path = path.join("backend.yaml");
        let backend = if backend_path.exists() {
            Some(Self::load_yaml::<BackendConfig>(&backend_path)?)
        } else {
            None
        };

        let holidays = Self::load_holidays(&path.join("holidays"))?;

        Ok(Self {
            config: EngineConfig::new(policy, backend, holidays),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday calendar in the directory. A missing directory
    /// means no holidays.
    fn load_holidays(dir: &Path) -> EngineResult<Vec<Holiday>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut holidays = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let calendar = Self::load_yaml::<HolidayCalendar>(&path)?;
                if let Some(stray) = calendar.holidays.iter().find(|h| h.date.year() != calendar.year) {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!(
                            "holiday '{}' on {} is outside calendar year {}",
                            stray.name, stray.date, calendar.year
                        ),
                    });
                }
                holidays.extend(calendar.holidays);
            }
        }
        Ok(holidays)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the attendance and salary policy.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }

    /// Returns the backend settings or `ConfigNotFound` if none were loaded.
    pub fn backend(&self) -> EngineResult<&BackendConfig> {
        self.config
            .backend()
            .ok_or_else(|| EngineError::ConfigNotFound {
                path: "backend.yaml".to_string(),
            })
    }

    /// Returns the holidays falling in the given month.
    pub fn holidays_in_month(&self, year: i32, month: u32) -> Vec<Holiday> {
        self.config
            .holidays()
            .iter()
            .filter(|h| h.date.year() == year && h.date.month() == month)
            .cloned()
            .collect()
    }

    /// True if the date is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.config
            .holidays()
            .binary_search_by(|h| h.date.cmp(&date))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.policy().standard_daily_hours, Decimal::from(8));
        assert_eq!(
            loader.policy().office_start,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(loader.policy().late_grace_minutes, 15);
        assert!(!loader.policy().default_working_days.contains(&Weekday::Sat));
    }

    #[test]
    fn test_backend_settings_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let backend = loader.backend().unwrap();
        assert_eq!(backend.max_attempts, 3);
        assert!(backend.base_url.starts_with("http"));
    }

    #[test]
    fn test_holidays_in_month() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let december = loader.holidays_in_month(2026, 12);
        assert_eq!(december.len(), 2);
        assert!(loader.is_holiday(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()));
        assert!(!loader.is_holiday(NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_loader_has_no_backend() {
        let loader = ConfigLoader::default();
        assert!(matches!(
            loader.backend(),
            Err(EngineError::ConfigNotFound { .. })
        ));
        assert!(loader.holidays_in_month(2026, 1).is_empty());
    }
}
