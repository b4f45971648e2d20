//! Configuration management for rangeweb
//!
//! This module handles loading, validation, and management of
//! rangeweb configuration from YAML files.

pub mod error;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Default selection settings applied at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default timezone identifier (IANA zone id)
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Days before today used to seed the initial range start
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            lookback_days: default_lookback_days(),
        }
    }
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_lookback_days() -> i64 {
    7
}

/// Per-date override entry for the calendar
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DateOverride {
    /// Message surfaced on hover (if any)
    #[serde(default)]
    pub message: Option<String>,
    /// Whether the date is unselectable regardless of other rules
    #[serde(default)]
    pub disabled: bool,
}

/// Calendar selection constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Maximum selectable span in inclusive days
    #[serde(default = "default_max_span_days")]
    pub max_span_days: i64,
    /// Maximum look-back in days; earlier dates are unselectable
    #[serde(default = "default_max_past_days")]
    pub max_past_days: i64,
    /// Date-keyed message/disabled overrides
    #[serde(default)]
    pub overrides: BTreeMap<NaiveDate, DateOverride>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_span_days: default_max_span_days(),
            max_past_days: default_max_past_days(),
            overrides: BTreeMap::new(),
        }
    }
}

fn default_max_span_days() -> i64 {
    10
}

fn default_max_past_days() -> i64 {
    90
}

/// One table column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column identifier (matches a record field)
    pub id: String,
    /// Display label
    pub label: String,
    /// Whether header clicks sort this column
    #[serde(default = "default_true")]
    pub sortable: bool,
}

fn default_true() -> bool {
    true
}

/// Table display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Column definitions, in display order
    #[serde(default = "default_columns")]
    pub columns: Vec<ColumnSpec>,
    /// Status (lower-cased) to CSS class mapping for badges
    #[serde(default = "default_status_styles")]
    pub status_styles: BTreeMap<String, String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            status_styles: default_status_styles(),
        }
    }
}

fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec { id: "name".to_string(), label: "Name".to_string(), sortable: true },
        ColumnSpec { id: "date".to_string(), label: "Date".to_string(), sortable: true },
        ColumnSpec { id: "amount".to_string(), label: "Amount".to_string(), sortable: true },
        ColumnSpec { id: "status".to_string(), label: "Status".to_string(), sortable: false },
    ]
}

fn default_status_styles() -> BTreeMap<String, String> {
    let mut styles = BTreeMap::new();
    styles.insert("completed".to_string(), "status-completed".to_string());
    styles.insert("pending".to_string(), "status-pending".to_string());
    styles.insert("failed".to_string(), "status-failed".to_string());
    styles.insert("processing".to_string(), "status-processing".to_string());
    styles
}

/// Remote transaction source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint URL returning the events payload
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
        }
    }
}

fn default_endpoint_url() -> String {
    "https://run.mocky.io/v3/672d4da9-a299-4270-ade5-73bc4e2add0a".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "debug".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Startup defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Calendar constraints
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Table display settings
    #[serde(default)]
    pub table: TableConfig,
    /// Remote source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.calendar.max_span_days < 1 {
            return Err(ConfigError::InvalidValue {
                field: "calendar.max_span_days".to_string(),
                reason: "Maximum span must be at least 1 day".to_string(),
            });
        }

        if self.calendar.max_past_days < 1 {
            return Err(ConfigError::InvalidValue {
                field: "calendar.max_past_days".to_string(),
                reason: "Maximum look-back must be at least 1 day".to_string(),
            });
        }

        if self.defaults.lookback_days < 0 || self.defaults.lookback_days > self.calendar.max_past_days {
            return Err(ConfigError::InvalidValue {
                field: "defaults.lookback_days".to_string(),
                reason: format!(
                    "Default look-back must be between 0 and {}",
                    self.calendar.max_past_days
                ),
            });
        }

        if self.table.columns.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "table.columns".to_string(),
                reason: "At least one column must be defined".to_string(),
            });
        }

        let mut seen = std::collections::BTreeSet::new();
        for column in &self.table.columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "table.columns".to_string(),
                    reason: format!("Duplicate column id: {}", column.id),
                });
            }
        }

        if self.source.endpoint_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source.endpoint_url".to_string(),
                reason: "Endpoint URL must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Look up a column definition by id
    pub fn column(&self, id: &str) -> Option<&ColumnSpec> {
        self.table.columns.iter().find(|c| c.id == id)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use error::{ConfigErrorCode, ConfigErrorSeverity};

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.defaults.timezone, "Europe/Moscow");
        assert_eq!(config.defaults.lookback_days, 7);
        assert_eq!(config.calendar.max_span_days, 10);
        assert_eq!(config.calendar.max_past_days, 90);
        assert_eq!(config.table.columns.len(), 4);
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.calendar.overrides.is_empty());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
        assert_eq!(err.severity(), ConfigErrorSeverity::Error);
    }

    #[test]
    fn test_lookback_exceeding_max_past_rejected() {
        let mut config = Config::default();
        config.defaults.lookback_days = 120;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_column_ids_rejected() {
        let mut config = Config::default();
        config.table.columns.push(ColumnSpec {
            id: "name".to_string(),
            label: "Name again".to_string(),
            sortable: false,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_parse_from_yaml() {
        let yaml = r#"
calendar:
  overrides:
    2025-04-16:
      message: "Holiday - Date Disabled"
      disabled: true
    2025-04-20:
      message: "Partial availability"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let holiday = NaiveDate::from_ymd_opt(2025, 4, 16).unwrap();
        let partial = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();

        assert!(config.calendar.overrides[&holiday].disabled);
        assert_eq!(
            config.calendar.overrides[&holiday].message.as_deref(),
            Some("Holiday - Date Disabled")
        );
        assert!(!config.calendar.overrides[&partial].disabled);
    }

    #[test]
    fn test_column_lookup() {
        let config = Config::default();
        assert!(config.column("date").map_or(false, |c| c.sortable));
        assert!(config.column("status").map_or(true, |c| !c.sortable));
        assert!(config.column("missing").is_none());
    }
}
