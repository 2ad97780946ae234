use thiserror::Error;
use tracing::debug;

use crate::validate::result::{ValidationResult, ValidationResultType};

/// A failed validation, aggregating every result of the pass.
///
/// Produced only at the boundary where a caller asks for an error instead of
/// a result list; schemas and rules never create it. Inspect
/// [`results`](ValidationError::results) for per-field detail rather than
/// parsing the message.
///
/// # Examples
///
/// ```
/// use value_schema_core::{ValidationError, ValidationResult};
///
/// let results = vec![
///     ValidationResult::warning("foo", "UNEXPECTED_PROPERTY", "Found unexpected property foo"),
/// ];
///
/// // Warnings only fail in strict mode.
/// assert!(ValidationError::from_results(Some("123"), results.clone(), false).is_none());
///
/// let err = ValidationError::from_results(Some("123"), results, true).unwrap();
/// assert_eq!(err.correlation_id(), Some("123"));
/// assert_eq!(err.to_string(), "Validation failed: Found unexpected property foo");
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    correlation_id: Option<String>,
    message: String,
    results: Vec<ValidationResult>,
}

impl ValidationError {
    /// Error code reported to callers of failed validations.
    pub const CODE: &'static str = "INVALID_DATA";

    /// Creates an error from already collected results.
    pub fn new(
        correlation_id: Option<&str>,
        message: impl Into<String>,
        results: Vec<ValidationResult>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.map(String::from),
            message: message.into(),
            results,
        }
    }

    /// Always `INVALID_DATA`.
    pub fn code(&self) -> &'static str {
        Self::CODE
    }

    /// Returns the correlation id of the failed call.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the composed message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the findings behind this error.
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Consumes the error and returns its findings.
    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    /// Joins the messages of all non-informational results after
    /// `"Validation failed"`.
    pub fn compose_message(results: &[ValidationResult]) -> String {
        let messages: Vec<&str> = results
            .iter()
            .filter(|r| r.result_type != ValidationResultType::Information)
            .map(|r| r.message.as_str())
            .collect();
        if messages.is_empty() {
            "Validation failed".to_string()
        } else {
            format!("Validation failed: {}", messages.join(", "))
        }
    }

    /// Builds an error when `results` contain a failure.
    ///
    /// Errors always fail; warnings fail only when `strict` is set.
    pub fn from_results(
        correlation_id: Option<&str>,
        results: Vec<ValidationResult>,
        strict: bool,
    ) -> Option<Self> {
        if !results.iter().any(|r| r.is_failure(strict)) {
            return None;
        }
        let message = Self::compose_message(&results);
        debug!(
            correlation_id = correlation_id.unwrap_or_default(),
            results = results.len(),
            strict,
            "Validation failed"
        );
        Some(Self::new(correlation_id, message, results))
    }

    /// Like [`from_results`](Self::from_results), as a `Result`.
    pub fn throw_if_needed(
        correlation_id: Option<&str>,
        results: Vec<ValidationResult>,
        strict: bool,
    ) -> Result<(), Self> {
        match Self::from_results(correlation_id, results, strict) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::result::codes;

    #[test]
    fn test_information_never_fails_and_is_not_in_message() {
        let results = vec![
            ValidationResult::new("", ValidationResultType::Information, "NOTE", "just saying"),
            ValidationResult::error(".a", codes::VALUE_IS_NULL, "a cannot be null"),
        ];
        let err = ValidationError::from_results(None, results, false).unwrap();
        assert_eq!(err.message(), "Validation failed: a cannot be null");
        assert_eq!(err.results().len(), 2);
        assert_eq!(err.code(), "INVALID_DATA");
    }

    #[test]
    fn test_no_failures_no_error() {
        assert!(ValidationError::from_results(None, Vec::new(), true).is_none());
        assert!(ValidationError::throw_if_needed(None, Vec::new(), true).is_ok());
    }

    #[test]
    fn test_messages_joined_with_commas() {
        let results = vec![
            ValidationResult::error("a", codes::BAD_VALUE, "first"),
            ValidationResult::warning("b", codes::UNEXPECTED_PROPERTY, "second"),
        ];
        assert_eq!(
            ValidationError::compose_message(&results),
            "Validation failed: first, second"
        );
        assert_eq!(ValidationError::compose_message(&[]), "Validation failed");
    }
}
