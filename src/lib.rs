//! # CareSync - FHIR to SQLite Scheduling Sync
//!
//! CareSync is a sync tool built in Rust that pulls home-healthcare
//! scheduling data (nurses, patients, appointments) from a FHIR service
//! into a local SQLite store for a scheduling application.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** FHIR Appointment, Patient and Practitioner resources
//!   with bearer-token auth, pagination and record caps
//! - **Transforming** raw FHIR resources into flat domain records with
//!   fallback chains for inconsistently-populated fields
//! - **Resolving** the patient/nurse ids an appointment batch references
//!   so entity fetches stay scoped to what is needed
//! - **Syncing** in strict dependency order (nurses, patients, then
//!   appointments) with per-record failure reporting
//!
//! ## Architecture
//!
//! CareSync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, sync)
//! - [`adapters`] - External integrations (FHIR service, SQLite store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caresync::adapters::fhir::FhirClient;
//! use caresync::adapters::store::SqliteStore;
//! use caresync::config::load_config;
//! use caresync::core::sync::SyncCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("caresync.toml")?;
//!
//!     let gateway = Arc::new(FhirClient::new(&config.fhir)?);
//!     let store = Arc::new(SqliteStore::open(&config.store.path)?);
//!
//!     let coordinator = SyncCoordinator::new(gateway, store);
//!     let summary = coordinator.run().await?;
//!
//!     println!("Synced {} appointments", summary.appointments_synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! CareSync uses the [`domain::CareSyncError`] type for all errors;
//! fallible functions return the [`domain::Result`] alias and propagate
//! with the `?` operator.
//!
//! ## Logging
//!
//! CareSync uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting sync");
//! warn!(appointment_id = "a-42", "Skipping appointment");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
