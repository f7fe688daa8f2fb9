//! Sync coordinator - orchestrates one end-to-end sync cycle
//!
//! The cycle runs in strict dependency order: appointments are fetched
//! first, the referenced patient/nurse ids are resolved, only those
//! entities are fetched, and upserts happen nurses then patients then
//! appointments because appointments require both to exist. Each step is
//! awaited before the next begins; there is no parallelism and no
//! cancellation.

use crate::adapters::fhir::FhirGateway;
use crate::adapters::store::RecordStore;
use crate::core::sync::references::resolve_references;
use crate::core::sync::summary::{SyncFailure, SyncSummary};
use crate::domain::{Appointment, AppointmentId, DateWindow, NurseId, PatientId, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Sync coordinator
///
/// Owns the record lifecycle for the duration of a cycle. Fatal errors
/// (fetch failure, whole-batch upsert failure, token failure) abort the
/// cycle and propagate; per-appointment problems are recorded in the
/// summary and the cycle continues.
pub struct SyncCoordinator {
    gateway: Arc<dyn FhirGateway>,
    store: Arc<dyn RecordStore>,
}

impl SyncCoordinator {
    /// Create a coordinator over a FHIR gateway and a record store
    pub fn new(gateway: Arc<dyn FhirGateway>, store: Arc<dyn RecordStore>) -> Self {
        Self { gateway, store }
    }

    /// Run one sync cycle over the current calendar week
    pub async fn run(&self) -> Result<SyncSummary> {
        self.run_window(DateWindow::current_week()).await
    }

    /// Run one sync cycle over an explicit date window
    pub async fn run_window(&self, window: DateWindow) -> Result<SyncSummary> {
        let started = Instant::now();
        let mut summary = SyncSummary::new();

        tracing::info!(
            from = %window.start,
            to = %window.end,
            "Starting sync cycle"
        );

        self.store.init_schema().await?;

        // Step 1: appointments for the window. A failure here is fatal.
        let appointments = self.gateway.fetch_appointments(&window).await?;
        summary.appointments_fetched = appointments.len();

        if appointments.is_empty() {
            tracing::info!("No appointments in window, nothing to sync");
            summary = summary.with_duration(started.elapsed());
            summary.log_summary();
            return Ok(summary);
        }

        // Step 2: scope the entity fetches to what is actually referenced.
        let refs = resolve_references(&appointments);
        tracing::debug!(
            patients = refs.patient_ids.len(),
            nurses = refs.nurse_ids.len(),
            "Resolved referenced ids"
        );

        // Step 3: scoped fetches, sequential to respect upstream rate limits.
        let nurses = self.gateway.fetch_nurses_by_ids(&refs.nurse_ids).await?;
        let patients = self.gateway.fetch_patients_by_ids(&refs.patient_ids).await?;

        // Steps 4 and 5: nurses before patients before appointments.
        let nurse_outcome = self.store.upsert_nurses(&nurses).await?;
        for failure in &nurse_outcome.failures {
            tracing::warn!(nurse_id = %failure.id, error = %failure.error, "Nurse upsert skipped");
        }
        summary.nurses_synced = nurse_outcome.upserted;

        let patient_outcome = self.store.upsert_patients(&patients).await?;
        for failure in &patient_outcome.failures {
            tracing::warn!(patient_id = %failure.id, error = %failure.error, "Patient upsert skipped");
        }
        summary.patients_synced = patient_outcome.upserted;

        // Step 6: validate against the ids now committed to the store.
        // Records from earlier cycles count; a same-cycle record whose
        // own upsert failed does not, since it never reached the store.
        let known_patients = self.store.existing_patient_ids().await?;
        let known_nurses = self.store.existing_nurse_ids().await?;

        let mut valid = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            match validate_references(&appointment, &known_patients, &known_nurses) {
                Ok(()) => valid.push(appointment),
                Err(reason) => {
                    tracing::warn!(
                        appointment_id = %appointment.id,
                        reason = %reason,
                        "Skipping appointment with unresolved references"
                    );
                    summary.add_failure(SyncFailure::new(appointment.id.clone(), reason));
                }
            }
        }

        let appointment_outcome = self.store.upsert_appointments(&valid).await?;
        summary.appointments_synced = appointment_outcome.upserted;
        for failure in appointment_outcome.failures {
            match AppointmentId::new(failure.id.clone()) {
                Ok(id) => summary.add_failure(SyncFailure::new(id, failure.error)),
                Err(_) => {
                    tracing::warn!(error = %failure.error, "Appointment upsert failed without an id")
                }
            }
        }

        summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

/// Check that both referenced entities exist in the committed id sets
fn validate_references(
    appointment: &Appointment,
    known_patients: &HashSet<PatientId>,
    known_nurses: &HashSet<NurseId>,
) -> std::result::Result<(), String> {
    let patient_id = appointment
        .patient_id
        .as_ref()
        .ok_or_else(|| "Missing patient reference".to_string())?;
    let nurse_id = appointment
        .nurse_id
        .as_ref()
        .ok_or_else(|| "Missing nurse reference".to_string())?;

    if !known_patients.contains(patient_id) {
        return Err(format!("Patient ID {patient_id} not found"));
    }
    if !known_nurses.contains(nurse_id) {
        return Err(format!("Nurse ID {nurse_id} not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppointmentStatus;
    use chrono::{TimeZone, Utc};

    fn appointment(id: &str, patient: Option<&str>, nurse: Option<&str>) -> Appointment {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        Appointment {
            id: AppointmentId::new(id).unwrap(),
            patient_id: patient.map(|p| PatientId::new(p).unwrap()),
            nurse_id: nurse.map(|n| NurseId::new(n).unwrap()),
            start_time: start,
            end_time: start,
            status: AppointmentStatus::Scheduled,
            notes: None,
            care_services: vec!["General Care".to_string()],
        }
    }

    #[test]
    fn test_validate_references_ok() {
        let known_patients: HashSet<PatientId> = [PatientId::new("p1").unwrap()].into();
        let known_nurses: HashSet<NurseId> = [NurseId::new("n1").unwrap()].into();

        let appt = appointment("a1", Some("p1"), Some("n1"));
        assert!(validate_references(&appt, &known_patients, &known_nurses).is_ok());
    }

    #[test]
    fn test_validate_references_missing_patient_row() {
        let known_patients = HashSet::new();
        let known_nurses: HashSet<NurseId> = [NurseId::new("n1").unwrap()].into();

        let appt = appointment("a1", Some("p9"), Some("n1"));
        let reason = validate_references(&appt, &known_patients, &known_nurses).unwrap_err();
        assert_eq!(reason, "Patient ID p9 not found");
    }

    #[test]
    fn test_validate_references_absent_reference() {
        let known_patients: HashSet<PatientId> = [PatientId::new("p1").unwrap()].into();
        let known_nurses: HashSet<NurseId> = [NurseId::new("n1").unwrap()].into();

        let appt = appointment("a1", None, Some("n1"));
        let reason = validate_references(&appt, &known_patients, &known_nurses).unwrap_err();
        assert_eq!(reason, "Missing patient reference");

        let appt = appointment("a2", Some("p1"), None);
        let reason = validate_references(&appt, &known_patients, &known_nurses).unwrap_err();
        assert_eq!(reason, "Missing nurse reference");
    }
}
