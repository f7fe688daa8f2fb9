//! Sync pipeline
//!
//! One cycle: fetch appointments for a date window, resolve the
//! referenced patient/nurse ids, fetch those entities, then upsert in
//! dependency order. The [`SyncCoordinator`] drives the cycle and the
//! [`SyncSummary`] reports it.

pub mod coordinator;
pub mod references;
pub mod summary;

pub use coordinator::SyncCoordinator;
pub use references::{resolve_references, ReferencedIds};
pub use summary::{SyncFailure, SyncSummary};
