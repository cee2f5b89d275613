//! Error types for conversion, post-processing and descriptor loading.

use thiserror::Error;

use crate::validate::ValidationError;

/// Raised when a raw value cannot be converted to a parameter's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value could not be parsed as the expected type.
    #[error("'{value}' is not a valid {expected}")]
    Invalid { value: String, expected: String },

    /// A numeric value falls outside a declared range.
    #[error("{value} is not in the range {range}")]
    OutOfRange { value: String, range: String },

    /// The value is not one of the allowed choices.
    #[error("'{value}' is not one of {choices}")]
    NotAChoice { value: String, choices: String },

    /// A date/time string matches none of the accepted formats.
    #[error("'{value}' does not match the formats {formats}")]
    DateTimeFormat { value: String, formats: String },

    /// The path must exist but does not.
    #[error("path '{0}' does not exist")]
    PathMissing(String),

    /// The path is a file where only directories are accepted.
    #[error("path '{0}' is a file")]
    PathIsFile(String),

    /// The path is a directory where only files are accepted.
    #[error("path '{0}' is a directory")]
    PathIsDirectory(String),

    /// A tuple or fixed-arity value has the wrong number of elements.
    #[error("takes {expected} values but {actual} were given")]
    Arity { expected: usize, actual: usize },
}

/// Raised by the post-processing step of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The user cancelled; not reported as a failure.
    #[error("aborted")]
    Abort,

    /// A required parameter ended up without a value.
    #[error("missing parameter: {0}")]
    Missing(String),

    /// The callback rejected the value.
    #[error("{0}")]
    Failed(String),
}

/// Errors that can occur while loading or saving a command descriptor.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The descriptor parsed but is structurally invalid.
    #[error("invalid command descriptor: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
