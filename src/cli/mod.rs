//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for CareSync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// CareSync - FHIR to SQLite scheduling sync
#[derive(Parser, Debug)]
#[command(name = "caresync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "caresync.toml", env = "CARESYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CARESYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one sync cycle against the configured FHIR service
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show record counts in the local store
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
