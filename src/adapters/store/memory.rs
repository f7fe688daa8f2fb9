//! In-memory record store
//!
//! Backs the same [`RecordStore`] contract as the SQLite store. Used for
//! coordinator tests and dry runs where no database file is wanted.

use crate::adapters::store::traits::{RecordStore, UpsertFailure, UpsertOutcome};
use crate::domain::{
    Appointment, AppointmentId, CareSyncError, Nurse, NurseId, Patient, PatientId, Result,
    StoreError,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    nurses: HashMap<NurseId, Nurse>,
    patients: HashMap<PatientId, Patient>,
    appointments: HashMap<String, Appointment>,
}

/// In-memory implementation of [`RecordStore`]
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Appointment ids whose insert should fail, for exercising the
    /// per-record skip path in tests
    fail_appointment_ids: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Force inserts of the given appointment id to fail
    pub fn fail_appointment(&self, id: &str) {
        self.fail_appointment_ids
            .lock()
            .expect("lock poisoned")
            .insert(id.to_string());
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| {
            CareSyncError::Store(StoreError::TransactionFailed(
                "Store lock poisoned".to_string(),
            ))
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn init_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_nurses(&self, nurses: &[Nurse]) -> Result<UpsertOutcome> {
        let mut tables = self.tables()?;
        for nurse in nurses {
            tables.nurses.insert(nurse.id.clone(), nurse.clone());
        }
        Ok(UpsertOutcome {
            upserted: nurses.len(),
            failures: Vec::new(),
        })
    }

    async fn upsert_patients(&self, patients: &[Patient]) -> Result<UpsertOutcome> {
        let mut tables = self.tables()?;
        for patient in patients {
            tables.patients.insert(patient.id.clone(), patient.clone());
        }
        Ok(UpsertOutcome {
            upserted: patients.len(),
            failures: Vec::new(),
        })
    }

    async fn upsert_appointments(&self, appointments: &[Appointment]) -> Result<UpsertOutcome> {
        let fail_ids = self
            .fail_appointment_ids
            .lock()
            .map_err(|_| {
                CareSyncError::Store(StoreError::TransactionFailed(
                    "Store lock poisoned".to_string(),
                ))
            })?
            .clone();

        let mut tables = self.tables()?;
        let mut outcome = UpsertOutcome::empty();
        for appointment in appointments {
            if fail_ids.contains(appointment.id.as_str()) {
                outcome.failures.push(UpsertFailure {
                    id: appointment.id.as_str().to_string(),
                    error: "simulated insert failure".to_string(),
                });
                continue;
            }
            if appointment.patient_id.is_none() || appointment.nurse_id.is_none() {
                outcome.failures.push(UpsertFailure {
                    id: appointment.id.as_str().to_string(),
                    error: "Missing patient or nurse reference".to_string(),
                });
                continue;
            }
            tables
                .appointments
                .insert(appointment.id.as_str().to_string(), appointment.clone());
            outcome.upserted += 1;
        }
        Ok(outcome)
    }

    async fn existing_nurse_ids(&self) -> Result<HashSet<NurseId>> {
        Ok(self.tables()?.nurses.keys().cloned().collect())
    }

    async fn existing_patient_ids(&self) -> Result<HashSet<PatientId>> {
        Ok(self.tables()?.patients.keys().cloned().collect())
    }

    async fn existing_appointment_ids(&self) -> Result<HashSet<AppointmentId>> {
        Ok(self
            .tables()?
            .appointments
            .keys()
            .filter_map(|id| AppointmentId::new(id.clone()).ok())
            .collect())
    }

    async fn count_nurses(&self) -> Result<usize> {
        Ok(self.tables()?.nurses.len())
    }

    async fn count_patients(&self) -> Result<usize> {
        Ok(self.tables()?.patients.len())
    }

    async fn count_appointments(&self) -> Result<usize> {
        Ok(self.tables()?.appointments.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_upsert_and_count() {
        let store = MemoryStore::new();
        store.init_schema().await.unwrap();

        let nurse = Nurse {
            id: NurseId::new("n1").unwrap(),
            name: "Nurse".to_string(),
            title: "RN".to_string(),
            specialty: "General".to_string(),
            phone: None,
            email: None,
        };

        store.upsert_nurses(&[nurse.clone()]).await.unwrap();
        store.upsert_nurses(&[nurse]).await.unwrap();
        assert_eq!(store.count_nurses().await.unwrap(), 1);
    }
}
