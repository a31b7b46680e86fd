//! Configuration errors raised at the host boundary.

use thiserror::Error;

/// A raw configuration value could not be decoded.
///
/// The validation pipeline itself never fails; these errors are produced
/// while turning attribute strings into a [`ValidationPolicy`](crate::types::ValidationPolicy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid extensions for `{field}`: {value:?} ({reason})")]
    InvalidExtensions {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid number for `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Negative value for `{field}`: {value}")]
    Negative { field: &'static str, value: String },

    #[error("Expected a whole number for `{field}`: {value}")]
    NotWholeNumber { field: &'static str, value: String },

    #[error("Value for `{field}` out of range: {value} (allowed: {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: u64,
        max: u64,
    },

    #[error("`{field}` must not be blank")]
    Blank { field: &'static str },

    #[error("Unknown attribute in `{field}`: {name:?}")]
    UnknownAttribute { field: &'static str, name: String },
}

impl ConfigError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigError::InvalidExtensions { field, .. }
            | ConfigError::InvalidNumber { field, .. }
            | ConfigError::Negative { field, .. }
            | ConfigError::NotWholeNumber { field, .. }
            | ConfigError::OutOfRange { field, .. }
            | ConfigError::Blank { field }
            | ConfigError::UnknownAttribute { field, .. } => field,
        }
    }
}
