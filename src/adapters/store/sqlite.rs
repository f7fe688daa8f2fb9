//! SQLite-backed record store
//!
//! Upserts use `INSERT OR REPLACE` (replace semantics, never merge) with
//! one transaction per entity batch. List fields (care needs, care
//! services) are stored as JSON text.

use crate::adapters::store::traits::{RecordStore, UpsertFailure, UpsertOutcome};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, CareSyncError, Nurse, NurseId, Patient,
    PatientId, Result, StoreError,
};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite implementation of [`RecordStore`]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| {
            CareSyncError::Store(StoreError::OpenFailed(format!(
                "{}: {e}",
                path.as_ref().display()
            )))
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (used in tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CareSyncError::Store(StoreError::OpenFailed(e.to_string())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            CareSyncError::Store(StoreError::TransactionFailed(
                "Store connection lock poisoned".to_string(),
            ))
        })
    }

    fn query_count(&self, table: &str) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(|e| CareSyncError::Store(StoreError::QueryFailed(e.to_string())))?;
        Ok(count as usize)
    }

    fn query_ids(&self, table: &str) -> Result<HashSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT id FROM {table}"))
            .map_err(|e| CareSyncError::Store(StoreError::QueryFailed(e.to_string())))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CareSyncError::Store(StoreError::QueryFailed(e.to_string())))?;

        let mut ids = HashSet::new();
        for row in rows {
            let id =
                row.map_err(|e| CareSyncError::Store(StoreError::QueryFailed(e.to_string())))?;
            ids.insert(id);
        }
        Ok(ids)
    }
}

fn to_json(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS nurses (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                title      TEXT NOT NULL,
                specialty  TEXT NOT NULL,
                phone      TEXT,
                email      TEXT
            );
            CREATE TABLE IF NOT EXISTS patients (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                phone          TEXT,
                email          TEXT,
                care_needs     TEXT NOT NULL,
                medical_notes  TEXT
            );
            CREATE TABLE IF NOT EXISTS appointments (
                id             TEXT PRIMARY KEY,
                patient_id     TEXT NOT NULL,
                nurse_id       TEXT NOT NULL,
                start_time     TEXT NOT NULL,
                end_time       TEXT NOT NULL,
                status         TEXT NOT NULL,
                notes          TEXT,
                care_services  TEXT NOT NULL
            );",
        )
        .map_err(|e| CareSyncError::Store(StoreError::SchemaFailed(e.to_string())))?;
        Ok(())
    }

    async fn upsert_nurses(&self, nurses: &[Nurse]) -> Result<UpsertOutcome> {
        if nurses.is_empty() {
            return Ok(UpsertOutcome::empty());
        }

        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;

        let mut outcome = UpsertOutcome::empty();
        for nurse in nurses {
            let result = tx.execute(
                "INSERT OR REPLACE INTO nurses (id, name, title, specialty, phone, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    nurse.id.as_str(),
                    nurse.name,
                    nurse.title,
                    nurse.specialty,
                    nurse.phone,
                    nurse.email,
                ],
            );
            match result {
                Ok(_) => outcome.upserted += 1,
                Err(e) => {
                    tracing::warn!(nurse_id = %nurse.id, error = %e, "Failed to upsert nurse");
                    outcome.failures.push(UpsertFailure {
                        id: nurse.id.as_str().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tx.commit()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;
        Ok(outcome)
    }

    async fn upsert_patients(&self, patients: &[Patient]) -> Result<UpsertOutcome> {
        if patients.is_empty() {
            return Ok(UpsertOutcome::empty());
        }

        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;

        let mut outcome = UpsertOutcome::empty();
        for patient in patients {
            let result = tx.execute(
                "INSERT OR REPLACE INTO patients (id, name, phone, email, care_needs, medical_notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    patient.id.as_str(),
                    patient.name,
                    patient.phone,
                    patient.email,
                    to_json(&patient.care_needs),
                    patient.medical_notes,
                ],
            );
            match result {
                Ok(_) => outcome.upserted += 1,
                Err(e) => {
                    tracing::warn!(patient_id = %patient.id, error = %e, "Failed to upsert patient");
                    outcome.failures.push(UpsertFailure {
                        id: patient.id.as_str().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tx.commit()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;
        Ok(outcome)
    }

    async fn upsert_appointments(&self, appointments: &[Appointment]) -> Result<UpsertOutcome> {
        if appointments.is_empty() {
            return Ok(UpsertOutcome::empty());
        }

        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;

        let mut outcome = UpsertOutcome::empty();
        for appointment in appointments {
            // Pre-validated by the coordinator; a missing reference here
            // means the caller skipped validation, so record it rather
            // than write a dangling row.
            let (Some(patient_id), Some(nurse_id)) =
                (&appointment.patient_id, &appointment.nurse_id)
            else {
                outcome.failures.push(UpsertFailure {
                    id: appointment.id.as_str().to_string(),
                    error: "Missing patient or nurse reference".to_string(),
                });
                continue;
            };

            let result = tx.execute(
                "INSERT OR REPLACE INTO appointments
                 (id, patient_id, nurse_id, start_time, end_time, status, notes, care_services)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    appointment.id.as_str(),
                    patient_id.as_str(),
                    nurse_id.as_str(),
                    appointment.start_time.to_rfc3339(),
                    appointment.end_time.to_rfc3339(),
                    appointment.status.as_str(),
                    appointment.notes,
                    to_json(&appointment.care_services),
                ],
            );
            match result {
                Ok(_) => outcome.upserted += 1,
                Err(e) => {
                    tracing::warn!(
                        appointment_id = %appointment.id,
                        error = %e,
                        "Failed to upsert appointment"
                    );
                    outcome.failures.push(UpsertFailure {
                        id: appointment.id.as_str().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tx.commit()
            .map_err(|e| CareSyncError::Store(StoreError::TransactionFailed(e.to_string())))?;
        Ok(outcome)
    }

    async fn existing_nurse_ids(&self) -> Result<HashSet<NurseId>> {
        Ok(self
            .query_ids("nurses")?
            .into_iter()
            .filter_map(|id| NurseId::new(id).ok())
            .collect())
    }

    async fn existing_patient_ids(&self) -> Result<HashSet<PatientId>> {
        Ok(self
            .query_ids("patients")?
            .into_iter()
            .filter_map(|id| PatientId::new(id).ok())
            .collect())
    }

    async fn existing_appointment_ids(&self) -> Result<HashSet<AppointmentId>> {
        Ok(self
            .query_ids("appointments")?
            .into_iter()
            .filter_map(|id| AppointmentId::new(id).ok())
            .collect())
    }

    async fn count_nurses(&self) -> Result<usize> {
        self.query_count("nurses")
    }

    async fn count_patients(&self) -> Result<usize> {
        self.query_count("patients")
    }

    async fn count_appointments(&self) -> Result<usize> {
        self.query_count("appointments")
    }
}

/// Parse a stored status string, defaulting to Scheduled for legacy rows
pub fn stored_status(s: &str) -> AppointmentStatus {
    AppointmentStatus::parse(s).unwrap_or(AppointmentStatus::Scheduled)
}
