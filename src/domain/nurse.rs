//! Nurse (practitioner) record

use crate::domain::ids::NurseId;
use serde::{Deserialize, Serialize};

/// Fallback title/specialty when the source carries no qualification data.
pub const DEFAULT_QUALIFICATION: &str = "Healthcare Professional";

/// Flat nurse record as stored locally
///
/// Produced by [`crate::core::transform::transform_practitioner`] from a
/// FHIR Practitioner resource. Overwritten in full on each sync cycle;
/// never deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    /// Externally-assigned stable identifier (natural key)
    pub id: NurseId,

    /// Display name, `"Unknown"` when the source has no name data
    pub name: String,

    /// Professional title, defaults to [`DEFAULT_QUALIFICATION`]
    pub title: String,

    /// Specialty, defaults to [`DEFAULT_QUALIFICATION`]
    pub specialty: String,

    /// Preferred phone number, if any
    pub phone: Option<String>,

    /// Preferred email address, if any
    pub email: Option<String>,
}
