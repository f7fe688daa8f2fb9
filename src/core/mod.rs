//! Core business logic
//!
//! - [`transform`] - FHIR resource to domain record transformation
//! - [`sync`] - the sync cycle orchestration

pub mod sync;
pub mod transform;
