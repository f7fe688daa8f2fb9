//! Configuration schema types
//!
//! Root structure mapping to the `caresync.toml` file, with per-section
//! validation.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main CareSync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareSyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Upstream FHIR service configuration
    pub fhir: FhirConfig,

    /// Local store configuration
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CareSyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.fhir.validate()?;
        self.store.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Upstream FHIR service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR search endpoints
    pub base_url: String,

    /// URL of the token-issuing endpoint
    pub token_url: String,

    /// OAuth client id for the token request
    pub client_id: String,

    /// OAuth client secret for the token request
    pub client_secret: SecretString,

    /// Per-request timeout in seconds for resource fetches
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout in seconds for the token request; token failure is fatal
    #[serde(default = "default_token_timeout_seconds")]
    pub token_timeout_seconds: u64,

    /// `_count` page size sent on the first request of a paginated fetch
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hard cap on accumulated records per collection fetch
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Number of ids per `_id` batch request (URL length constraint upstream)
    #[serde(default = "default_id_batch_size")]
    pub id_batch_size: usize,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl FhirConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "fhir.base_url must start with http:// or https://, got: {}",
                self.base_url
            ));
        }
        if self.token_url.trim().is_empty() {
            return Err("fhir.token_url cannot be empty".to_string());
        }
        if self.client_id.trim().is_empty() {
            return Err("fhir.client_id cannot be empty".to_string());
        }
        if self.page_size == 0 || self.page_size > 1000 {
            return Err(format!(
                "fhir.page_size must be between 1 and 1000, got: {}",
                self.page_size
            ));
        }
        if self.max_records == 0 {
            return Err("fhir.max_records must be greater than 0".to_string());
        }
        if self.id_batch_size == 0 || self.id_batch_size > 100 {
            return Err(format!(
                "fhir.id_batch_size must be between 1 and 100, got: {}",
                self.id_batch_size
            ));
        }
        Ok(())
    }
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("store.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging with rotation
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub file_path: String,

    /// Rotation policy (daily or hourly)
    #[serde(default = "default_rotation")]
    pub file_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_enabled && self.file_path.trim().is_empty() {
            return Err("logging.file_path cannot be empty when file logging is enabled".to_string());
        }
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.file_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.file_rotation '{}'. Must be one of: {}",
                self.file_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: false,
            file_path: default_log_path(),
            file_rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_token_timeout_seconds() -> u64 {
    10
}

fn default_page_size() -> usize {
    100
}

fn default_max_records() -> usize {
    500
}

fn default_id_batch_size() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
