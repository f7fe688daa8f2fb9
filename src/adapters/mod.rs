//! External integrations
//!
//! Adapters for the systems CareSync talks to:
//!
//! - [`fhir`] - the upstream FHIR (HCHB) service
//! - [`store`] - the local SQLite scheduling store

pub mod fhir;
pub mod store;
