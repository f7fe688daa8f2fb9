//! Domain models and types for CareSync.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`NurseId`], [`PatientId`], [`AppointmentId`])
//! - **Flat records** ([`Nurse`], [`Patient`], [`Appointment`]) as stored locally
//! - **Error types** ([`CareSyncError`], [`FhirError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! CareSync uses the newtype pattern for identifiers to prevent mixing
//! different ID types:
//!
//! ```rust
//! use caresync::domain::{NurseId, PatientId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let nurse_id = NurseId::new("nurse-123")?;
//! let patient_id = PatientId::new("patient-456")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: NurseId = patient_id;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust,no_run
//! use caresync::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = caresync::config::load_config("caresync.toml")?;
//!     Ok(())
//! }
//! ```

pub mod appointment;
pub mod errors;
pub mod ids;
pub mod nurse;
pub mod patient;
pub mod result;
pub mod window;

// Re-export commonly used types for convenience
pub use appointment::{Appointment, AppointmentStatus, DEFAULT_CARE_SERVICE};
pub use errors::{CareSyncError, FhirError, StoreError};
pub use ids::{AppointmentId, NurseId, PatientId};
pub use nurse::{Nurse, DEFAULT_QUALIFICATION};
pub use patient::Patient;
pub use result::Result;
pub use window::DateWindow;
