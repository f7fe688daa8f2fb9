//! Domain error types
//!
//! Error hierarchy for CareSync. All errors are domain-specific and
//! don't expose third-party types through the public API.

use thiserror::Error;

/// Main CareSync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CareSyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// FHIR service errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] FhirError),

    /// Local store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Sync cycle errors
    #[error("Sync error: {0}")]
    Sync(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised when talking to the upstream FHIR service
///
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum FhirError {
    /// Failed to reach the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Token acquisition or bearer auth failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body could not be parsed
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Single-resource fetch found nothing
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Errors raised by the local SQLite store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("Failed to open store: {0}")]
    OpenFailed(String),

    /// Schema creation or migration failed
    #[error("Schema error: {0}")]
    SchemaFailed(String),

    /// Transaction begin/commit failed
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A single row insert failed
    #[error("Insert failed for {id}: {message}")]
    InsertFailed { id: String, message: String },

    /// A query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CareSyncError {
    fn from(err: std::io::Error) -> Self {
        CareSyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CareSyncError {
    fn from(err: serde_json::Error) -> Self {
        CareSyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CareSyncError {
    fn from(err: toml::de::Error) -> Self {
        CareSyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CareSyncError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fhir_error_conversion() {
        let fhir_err = FhirError::ConnectionFailed("Network error".to_string());
        let err: CareSyncError = fhir_err.into();
        assert!(matches!(err, CareSyncError::Fhir(_)));
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::InsertFailed {
            id: "appt-1".to_string(),
            message: "constraint violation".to_string(),
        };
        let err: CareSyncError = store_err.into();
        assert!(matches!(err, CareSyncError::Store(_)));
        assert!(err.to_string().contains("appt-1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: CareSyncError = io_err.into();
        assert!(matches!(err, CareSyncError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: CareSyncError = json_err.into();
        assert!(matches!(err, CareSyncError::Serialization(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = CareSyncError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;

        let err = FhirError::Timeout("10s".to_string());
        let _: &dyn std::error::Error = &err;

        let err = StoreError::QueryFailed("bad sql".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
