//! Result type alias for CareSync
//!
//! Convenience Result alias using `CareSyncError` as the error type.

use super::errors::CareSyncError;

/// Result type alias for CareSync operations
///
/// # Examples
///
/// ```
/// use caresync::domain::result::Result;
/// use caresync::domain::errors::CareSyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CareSyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CareSyncError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CareSyncError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(CareSyncError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
