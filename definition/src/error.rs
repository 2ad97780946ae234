//! Error types for loading and compiling schema definitions.

use thiserror::Error;

/// Errors that can occur while reading, writing or compiling a definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension names no supported format.
    #[error("unsupported definition format: {0}")]
    UnsupportedFormat(String),

    /// The definition parsed but does not describe a valid schema.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
