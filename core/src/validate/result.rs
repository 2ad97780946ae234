use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AnyValue;

/// Machine-readable result codes produced by schemas and rules.
pub mod codes {
    pub const VALUE_IS_NULL: &str = "VALUE_IS_NULL";
    pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
    pub const VALUE_ISNOT_ARRAY: &str = "VALUE_ISNOT_ARRAY";
    pub const VALUE_ISNOT_MAP: &str = "VALUE_ISNOT_MAP";
    pub const UNEXPECTED_PROPERTY: &str = "UNEXPECTED_PROPERTY";
    pub const VALUE_NOT_INCLUDED: &str = "VALUE_NOT_INCLUDED";
    pub const VALUE_INCLUDED: &str = "VALUE_INCLUDED";
    pub const VALUE_NULL: &str = "VALUE_NULL";
    pub const VALUE_ONLY_ONE: &str = "VALUE_ONLY_ONE";
    pub const PROPERTIES_NOT_MATCH: &str = "PROPERTIES_NOT_MATCH";
    pub const BAD_VALUE: &str = "BAD_VALUE";
    pub const NOT_FAILED: &str = "NOT_FAILED";
}

/// Severity of a [`ValidationResult`].
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationResultType {
    /// Never fails a validation.
    Information,
    /// Fails a validation only in strict mode.
    Warning,
    /// Always fails a validation.
    Error,
}

impl fmt::Display for ValidationResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationResultType::Information => "INFO",
            ValidationResultType::Warning => "WARNING",
            ValidationResultType::Error => "ERROR",
        })
    }
}

/// One diagnostic found while validating a value.
///
/// `path` locates the offending value with dotted segments; the empty string
/// denotes the root.
///
/// # Examples
///
/// ```
/// use value_schema_core::{ValidationResult, ValidationResultType};
///
/// let result = ValidationResult::error(".age", "TYPE_MISMATCH", "Expected type Integer but found String")
///     .with_expected("Integer")
///     .with_actual("String");
/// assert_eq!(result.result_type, ValidationResultType::Error);
/// assert_eq!(result.path, ".age");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub path: String,
    #[serde(rename = "type")]
    pub result_type: ValidationResultType,
    pub code: String,
    pub message: String,
    pub expected: AnyValue,
    pub actual: AnyValue,
}

impl ValidationResult {
    /// Creates a result of the given type.
    pub fn new(
        path: impl Into<String>,
        result_type: ValidationResultType,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            result_type,
            code: code.into(),
            message: message.into(),
            expected: AnyValue::Null,
            actual: AnyValue::Null,
        }
    }

    /// Creates an error result.
    pub fn error(path: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, ValidationResultType::Error, code, message)
    }

    /// Creates a warning result.
    pub fn warning(
        path: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(path, ValidationResultType::Warning, code, message)
    }

    /// Sets the expected value.
    pub fn with_expected(mut self, expected: impl Into<AnyValue>) -> Self {
        self.expected = expected.into();
        self
    }

    /// Sets the actual value.
    pub fn with_actual(mut self, actual: impl Into<AnyValue>) -> Self {
        self.actual = actual.into();
        self
    }

    /// Returns `true` when this result fails a validation in the given mode.
    pub fn is_failure(&self, strict: bool) -> bool {
        match self.result_type {
            ValidationResultType::Error => true,
            ValidationResultType::Warning => strict,
            ValidationResultType::Information => false,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{} {} {}: {}", self.result_type, path, self.code, self.message)
    }
}

/// Human name for a path in messages: `"value"` at the root.
pub(crate) fn display_name(path: &str) -> &str {
    if path.is_empty() { "value" } else { path }
}
