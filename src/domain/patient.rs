//! Patient record

use crate::domain::ids::PatientId;
use serde::{Deserialize, Serialize};

/// Flat patient record as stored locally
///
/// Produced by [`crate::core::transform::transform_patient`] from a FHIR
/// Patient resource. Same overwrite-on-sync lifecycle as [`crate::domain::Nurse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Externally-assigned stable identifier (natural key)
    pub id: PatientId,

    /// Display name, `"Unknown"` when the source has no name data
    pub name: String,

    /// Preferred phone number, if any
    pub phone: Option<String>,

    /// Preferred email address, if any
    pub email: Option<String>,

    /// Ordered care-need strings accumulated from the recognized
    /// extensions (diagnosis, service code, diet). Empty is valid.
    pub care_needs: Vec<String>,

    /// Free-text medical notes from the information extension, if any
    pub medical_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_serde_round_trip() {
        let patient = Patient {
            id: PatientId::new("patient-1").unwrap(),
            name: "Erik Larsson".to_string(),
            phone: None,
            email: Some("erik@example.com".to_string()),
            care_needs: vec!["Diabetes".to_string(), "Diet: Low sodium".to_string()],
            medical_notes: Some("Allergic to penicillin".to_string()),
        };

        let json = serde_json::to_string(&patient).unwrap();
        let back: Patient = serde_json::from_str(&json).unwrap();
        assert_eq!(patient, back);
    }

    #[test]
    fn test_empty_care_needs_is_valid() {
        let patient = Patient {
            id: PatientId::new("patient-2").unwrap(),
            name: "Unknown".to_string(),
            phone: None,
            email: None,
            care_needs: Vec::new(),
            medical_notes: None,
        };
        assert!(patient.care_needs.is_empty());
    }
}
