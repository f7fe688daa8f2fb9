//! Configuration management
//!
//! TOML-backed configuration with `${VAR}` substitution, `CARESYNC_*`
//! environment overrides, validation, and secret protection for the FHIR
//! client credentials.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{ApplicationConfig, CareSyncConfig, FhirConfig, LoggingConfig, StoreConfig};
pub use secret::{secret_string, SecretString, SecretValue};
