//! Logging and observability
//!
//! Structured logging with configurable levels, console output, and an
//! optional JSON file layer with rotation for unattended sync runs.
//!
//! # Example
//!
//! ```no_run
//! use caresync::logging::init_logging;
//! use caresync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Sync starting");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
