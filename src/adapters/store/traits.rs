//! Store abstraction traits
//!
//! One explicit capability contract implemented by every backend variant
//! (SQLite, in-memory), selected once at startup and never probed at call
//! time.

use crate::domain::{Appointment, AppointmentId, Nurse, NurseId, Patient, PatientId, Result};
use async_trait::async_trait;
use std::collections::HashSet;

/// Result of a batch upsert
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    /// Number of records written
    pub upserted: usize,

    /// Per-record failures that were skipped without aborting the batch
    pub failures: Vec<UpsertFailure>,
}

impl UpsertOutcome {
    /// Outcome with no writes and no failures
    pub fn empty() -> Self {
        Self {
            upserted: 0,
            failures: Vec::new(),
        }
    }
}

/// A single record that could not be written
#[derive(Debug, Clone)]
pub struct UpsertFailure {
    /// Record id that failed
    pub id: String,

    /// Human-readable reason
    pub error: String,
}

/// Record store contract for the sync pipeline
///
/// Upserts are insert-or-replace by id (full-record overwrite, never
/// merge) and atomic per call: the batch runs inside one transaction,
/// individual record errors inside it are caught and reported in the
/// outcome, and only a transaction-level failure is returned as an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create tables if they don't exist
    async fn init_schema(&self) -> Result<()>;

    /// Upsert a batch of nurses
    async fn upsert_nurses(&self, nurses: &[Nurse]) -> Result<UpsertOutcome>;

    /// Upsert a batch of patients
    async fn upsert_patients(&self, patients: &[Patient]) -> Result<UpsertOutcome>;

    /// Upsert a batch of appointments
    ///
    /// Referential pre-validation happens in the sync coordinator; the
    /// store only reports row-level insert errors.
    async fn upsert_appointments(&self, appointments: &[Appointment]) -> Result<UpsertOutcome>;

    /// Ids of all nurses currently committed to the store
    async fn existing_nurse_ids(&self) -> Result<HashSet<NurseId>>;

    /// Ids of all patients currently committed to the store
    async fn existing_patient_ids(&self) -> Result<HashSet<PatientId>>;

    /// Ids of all appointments currently committed to the store
    async fn existing_appointment_ids(&self) -> Result<HashSet<AppointmentId>>;

    /// Number of stored nurses
    async fn count_nurses(&self) -> Result<usize>;

    /// Number of stored patients
    async fn count_patients(&self) -> Result<usize>;

    /// Number of stored appointments
    async fn count_appointments(&self) -> Result<usize>;
}
