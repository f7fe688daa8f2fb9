//! FHIR resource transformers
//!
//! Pure, side-effect-free mappings from raw FHIR resource JSON into the
//! flat records the local store holds. All three transformers are total:
//! they never error on malformed input, degrading individual fields to
//! null/defaults instead. The shared fallback-chain machinery lives in
//! [`extract`].

pub mod appointment;
pub mod extract;
pub mod patient;
pub mod practitioner;

pub use appointment::transform_appointment;
pub use patient::transform_patient;
pub use practitioner::transform_practitioner;
