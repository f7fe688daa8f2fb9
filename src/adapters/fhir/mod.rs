//! FHIR service adapter
//!
//! Bearer-token authentication against the token endpoint plus paginated
//! and batched-by-id search fetches against the Appointment, Patient and
//! Practitioner endpoints.

pub mod client;
pub mod token;

pub use client::{FhirClient, FhirGateway};
pub use token::TokenProvider;
