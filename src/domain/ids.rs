//! Domain identifier types with validation
//!
//! Newtype wrappers for the externally-assigned identifiers used by the
//! sync pipeline. Identifiers are opaque strings owned by the upstream
//! FHIR service; this system never generates them except for the
//! degraded `unknown-<timestamp>` fallback handled in the transformers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $label:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string
            ///
            /// Returns an error when the identifier is empty or whitespace.
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Identifier for a record whose source carried no usable id
            pub fn synthetic() -> Self {
                Self(format!("unknown-{}", chrono::Utc::now().timestamp_millis()))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(
    /// Identifier of a nurse (FHIR Practitioner resource)
    ///
    /// # Examples
    ///
    /// ```
    /// use caresync::domain::ids::NurseId;
    /// use std::str::FromStr;
    ///
    /// let id = NurseId::from_str("nurse-001").unwrap();
    /// assert_eq!(id.as_str(), "nurse-001");
    /// ```
    NurseId,
    "Nurse ID"
);

id_type!(
    /// Identifier of a patient (FHIR Patient resource)
    PatientId,
    "Patient ID"
);

id_type!(
    /// Identifier of an appointment (FHIR Appointment resource)
    AppointmentId,
    "Appointment ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nurse_id_valid() {
        let id = NurseId::new("nurse-123").unwrap();
        assert_eq!(id.as_str(), "nurse-123");
        assert_eq!(id.to_string(), "nurse-123");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(NurseId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
        assert!(AppointmentId::new("").is_err());
    }

    #[test]
    fn test_from_str_round_trip() {
        let id = PatientId::from_str("patient-9").unwrap();
        assert_eq!(id.into_inner(), "patient-9");
    }

    #[test]
    fn test_synthetic_id_is_valid() {
        let id = AppointmentId::synthetic();
        assert!(id.as_str().starts_with("unknown-"));
        assert!(AppointmentId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_ids_hashable() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(PatientId::new("p1").unwrap());
        set.insert(PatientId::new("p1").unwrap());
        assert_eq!(set.len(), 1);
    }
}
