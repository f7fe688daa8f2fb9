//! Sync command implementation
//!
//! This module implements the `sync` command that runs one full cycle
//! against the configured FHIR service and local SQLite store.

use crate::adapters::fhir::FhirClient;
use crate::adapters::store::{MemoryStore, RecordStore, SqliteStore};
use crate::config::load_config;
use crate::core::sync::SyncCoordinator;
use crate::domain::DateWindow;
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Sync the calendar week containing this date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Dry run mode - fetch and validate without writing to the store
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Resolve the date window before touching the network
        let window = match &self.date {
            Some(raw) => match raw.parse::<NaiveDate>() {
                Ok(date) => DateWindow::week_containing(date),
                Err(_) => {
                    eprintln!("Invalid --date value: {raw}. Expected YYYY-MM-DD");
                    return Ok(2);
                }
            },
            None => DateWindow::current_week(),
        };

        if self.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("DRY RUN MODE - records will not be written to the store");
            println!();
        }

        let gateway = match FhirClient::new(&config.fhir) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create FHIR client");
                eprintln!("Failed to initialize FHIR client: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let store: Arc<dyn RecordStore> = if self.dry_run {
            Arc::new(MemoryStore::new())
        } else {
            match SqliteStore::open(&config.store.path) {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    tracing::error!(error = %e, path = %config.store.path, "Failed to open store");
                    eprintln!("Failed to open store at {}: {e}", config.store.path);
                    return Ok(5);
                }
            }
        };

        let coordinator = SyncCoordinator::new(gateway, store);

        println!("Syncing week {} to {}...", window.start, window.end);
        println!();

        let summary = match coordinator.run_window(window).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Display summary
        println!("Sync Summary:");
        println!("  Nurses: {}", summary.nurses_synced);
        println!("  Patients: {}", summary.patients_synced);
        println!(
            "  Appointments: {} of {} fetched",
            summary.appointments_synced, summary.appointments_fetched
        );
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

        if !summary.failures.is_empty() {
            println!();
            println!("Skipped appointments:");
            for failure in &summary.failures {
                println!("  - {}: {}", failure.appointment_id, failure.reason);
            }
        }

        println!();
        if summary.is_complete() {
            println!("Sync completed successfully");
        } else {
            println!(
                "Sync completed with {} skipped appointment(s)",
                summary.failures.len()
            );
        }

        // Partial appointment failures are still an overall success
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_args_defaults() {
        let args = SyncArgs {
            date: None,
            dry_run: false,
        };

        assert!(args.date.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_sync_args_with_overrides() {
        let args = SyncArgs {
            date: Some("2024-03-14".to_string()),
            dry_run: true,
        };

        assert_eq!(args.date, Some("2024-03-14".to_string()));
        assert!(args.dry_run);
    }
}
