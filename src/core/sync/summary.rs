//! Sync summary and reporting

use crate::domain::AppointmentId;
use std::time::Duration;

/// A single appointment that could not be synced
#[derive(Debug, Clone)]
pub struct SyncFailure {
    /// Appointment that was skipped
    pub appointment_id: AppointmentId,

    /// Human-readable reason, e.g. `Patient ID p-7 not found`
    pub reason: String,
}

impl SyncFailure {
    pub fn new(appointment_id: AppointmentId, reason: impl Into<String>) -> Self {
        Self {
            appointment_id,
            reason: reason.into(),
        }
    }
}

/// Summary of one sync cycle
///
/// A cycle with partial appointment failures is still an overall success;
/// only a fatal error in the fetch or batch-upsert steps aborts the cycle
/// before a summary exists.
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Nurses written this cycle
    pub nurses_synced: usize,

    /// Patients written this cycle
    pub patients_synced: usize,

    /// Appointments written this cycle
    pub appointments_synced: usize,

    /// Appointments fetched from the upstream before validation
    pub appointments_fetched: usize,

    /// Per-appointment failures (missing references, insert errors)
    pub failures: Vec<SyncFailure>,

    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl SyncSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a failed appointment
    pub fn add_failure(&mut self, failure: SyncFailure) {
        self.failures.push(failure);
    }

    /// True when every fetched appointment was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            nurses = self.nurses_synced,
            patients = self.patients_synced,
            appointments = self.appointments_synced,
            fetched = self.appointments_fetched,
            failed = self.failures.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Sync cycle completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                appointment_id = %failure.appointment_id,
                reason = %failure.reason,
                "Appointment skipped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_defaults() {
        let summary = SyncSummary::new();
        assert_eq!(summary.nurses_synced, 0);
        assert_eq!(summary.appointments_synced, 0);
        assert!(summary.failures.is_empty());
        assert!(summary.is_complete());
    }

    #[test]
    fn test_summary_with_duration() {
        let summary = SyncSummary::new().with_duration(Duration::from_secs(3));
        assert_eq!(summary.duration, Duration::from_secs(3));
    }

    #[test]
    fn test_add_failure() {
        let mut summary = SyncSummary::new();
        summary.add_failure(SyncFailure::new(
            AppointmentId::new("a2").unwrap(),
            "Patient ID p-7 not found",
        ));

        assert!(!summary.is_complete());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].appointment_id.as_str(), "a2");
        assert!(summary.failures[0].reason.contains("p-7"));
    }
}
