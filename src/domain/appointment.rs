//! Appointment record and status mapping

use crate::domain::ids::{AppointmentId, NurseId, PatientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback care-service entry; the list is never empty in a stored record.
pub const DEFAULT_CARE_SERVICE: &str = "General Care";

/// Appointment status as stored locally
///
/// Derived from the FHIR status via a fixed mapping table. Anything the
/// table doesn't recognize, including a missing status, maps to
/// [`AppointmentStatus::Scheduled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Missed,
}

impl AppointmentStatus {
    /// Map a FHIR appointment status string onto the local status set
    ///
    /// The mapping is total: unknown or absent input yields `Scheduled`.
    ///
    /// # Examples
    ///
    /// ```
    /// use caresync::domain::AppointmentStatus;
    ///
    /// assert_eq!(AppointmentStatus::from_fhir(Some("booked")), AppointmentStatus::Scheduled);
    /// assert_eq!(AppointmentStatus::from_fhir(Some("noshow")), AppointmentStatus::Missed);
    /// assert_eq!(AppointmentStatus::from_fhir(None), AppointmentStatus::Scheduled);
    /// ```
    pub fn from_fhir(status: Option<&str>) -> Self {
        match status {
            Some("proposed") | Some("pending") | Some("booked") => AppointmentStatus::Scheduled,
            Some("arrived") => AppointmentStatus::InProgress,
            Some("fulfilled") => AppointmentStatus::Completed,
            Some("cancelled") | Some("entered-in-error") => AppointmentStatus::Cancelled,
            Some("noshow") => AppointmentStatus::Missed,
            _ => AppointmentStatus::Scheduled,
        }
    }

    /// Stable string form used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Missed => "MISSED",
        }
    }

    /// Parse the stored string form back into a status
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "IN_PROGRESS" => Some(AppointmentStatus::InProgress),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            "MISSED" => Some(AppointmentStatus::Missed),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flat appointment record as stored locally
///
/// Produced by [`crate::core::transform::transform_appointment`]. The
/// patient/nurse references may be absent in source data, but both are
/// required for a successful upsert; the sync coordinator records a
/// failure for any appointment missing either reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Externally-assigned stable identifier (natural key)
    pub id: AppointmentId,

    /// Referenced patient, when the source carried a usable reference
    pub patient_id: Option<PatientId>,

    /// Referenced nurse, when the source carried a usable reference
    pub nurse_id: Option<NurseId>,

    /// Start timestamp
    pub start_time: DateTime<Utc>,

    /// End timestamp; never null, coerced to `start_time` when the
    /// source provides no end
    pub end_time: DateTime<Utc>,

    /// Mapped status
    pub status: AppointmentStatus,

    /// Free-text notes, if any
    pub notes: Option<String>,

    /// Care-service display strings; never empty, defaults to
    /// `["General Care"]`
    pub care_services: Vec<String>,
}
