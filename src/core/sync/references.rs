//! Reference resolution over a fetched appointment batch
//!
//! Computes the distinct patient and nurse ids a batch of appointments
//! actually references, so the scoped fetch in the next sync step only
//! asks the upstream for entities that are needed.

use crate::domain::{Appointment, NurseId, PatientId};
use std::collections::HashSet;

/// Distinct ids referenced by an appointment batch
///
/// Set semantics: entries are unique and their order is not significant.
#[derive(Debug, Clone, Default)]
pub struct ReferencedIds {
    pub patient_ids: Vec<PatientId>,
    pub nurse_ids: Vec<NurseId>,
}

impl ReferencedIds {
    pub fn is_empty(&self) -> bool {
        self.patient_ids.is_empty() && self.nurse_ids.is_empty()
    }
}

/// Extract the distinct referenced patient/nurse ids, dropping absent
/// references
///
/// Pure and deterministic for a given input batch.
pub fn resolve_references(appointments: &[Appointment]) -> ReferencedIds {
    let mut patient_ids: HashSet<PatientId> = HashSet::new();
    let mut nurse_ids: HashSet<NurseId> = HashSet::new();

    for appointment in appointments {
        if let Some(patient_id) = &appointment.patient_id {
            patient_ids.insert(patient_id.clone());
        }
        if let Some(nurse_id) = &appointment.nurse_id {
            nurse_ids.insert(nurse_id.clone());
        }
    }

    ReferencedIds {
        patient_ids: patient_ids.into_iter().collect(),
        nurse_ids: nurse_ids.into_iter().collect(),
    }
}
