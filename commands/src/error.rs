//! Error types for command execution.

use thiserror::Error;
use value_schema_core::ValidationError;

/// Errors returned by [`Executable::execute`](crate::Executable::execute).
#[derive(Debug, Error)]
pub enum CommandError {
    /// The arguments failed the command's schema; the action did not run.
    #[error("{source}")]
    BadRequest {
        correlation_id: Option<String>,
        #[source]
        source: ValidationError,
    },

    /// No command is registered under the requested name.
    #[error("Requested command {name} does not exist")]
    NotFound {
        correlation_id: Option<String>,
        name: String,
    },

    /// The action ran and reported a failure.
    #[error("Execution of {name} failed: {message}")]
    Failed {
        correlation_id: Option<String>,
        name: String,
        message: String,
    },
}

impl CommandError {
    /// Wraps failed argument validation.
    pub fn bad_request(correlation_id: Option<&str>, source: ValidationError) -> Self {
        CommandError::BadRequest {
            correlation_id: correlation_id.map(String::from),
            source,
        }
    }

    /// Reports a command name that is not registered.
    pub fn not_found(correlation_id: Option<&str>, name: impl Into<String>) -> Self {
        CommandError::NotFound {
            correlation_id: correlation_id.map(String::from),
            name: name.into(),
        }
    }

    /// Reports a command whose action failed.
    pub fn failed(
        correlation_id: Option<&str>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CommandError::Failed {
            correlation_id: correlation_id.map(String::from),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::BadRequest { source, .. } => source.code(),
            CommandError::NotFound { .. } => "CMD_NOT_FOUND",
            CommandError::Failed { .. } => "EXEC_FAILED",
        }
    }

    /// Returns the correlation id carried by the error.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            CommandError::BadRequest { correlation_id, .. }
            | CommandError::NotFound { correlation_id, .. }
            | CommandError::Failed { correlation_id, .. } => correlation_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use value_schema_core::ValidationResult;

    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let results = vec![ValidationResult::error(".a", "VALUE_IS_NULL", ".a must not be null")];
        let source = ValidationError::from_results(Some("c1"), results, false).unwrap();

        let bad = CommandError::bad_request(Some("c1"), source);
        assert_eq!(bad.code(), "INVALID_DATA");
        assert_eq!(bad.correlation_id(), Some("c1"));
        assert_eq!(bad.to_string(), "Validation failed: .a must not be null");

        let missing = CommandError::not_found(None, "ping");
        assert_eq!(missing.code(), "CMD_NOT_FOUND");
        assert_eq!(missing.correlation_id(), None);
        assert_eq!(missing.to_string(), "Requested command ping does not exist");

        let failed = CommandError::failed(Some("c2"), "ping", "timeout");
        assert_eq!(failed.code(), "EXEC_FAILED");
        assert_eq!(failed.to_string(), "Execution of ping failed: timeout");
    }
}
