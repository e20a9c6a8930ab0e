//! Error types for loading, overlaying and validating configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::binding::FieldKind;

/// Errors returned by [`load_config`](crate::load_config) and the [`ConfigLoader`](crate::ConfigLoader).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read (missing, permission denied, ...).
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is neither YAML nor JSON matching the record shape.
    ///
    /// Only the detail of the final (JSON) attempt is kept.
    #[error("failed to parse configuration {}: {source}", .path.display())]
    Parse {
        /// Path of the parsed file, or `<memory>` for in-memory input.
        path: PathBuf,
        /// Error reported by the JSON fallback.
        #[source]
        source: serde_json::Error,
    },

    /// An environment variable could not be applied to the record.
    #[error("failed to apply environment variables: {0}")]
    Overlay(#[from] OverlayError),

    /// A record rejected its own contents.
    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

impl ConfigError {
    /// Creates a read error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error for `path`.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Errors raised while overlaying environment variables onto a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A present variable could not be coerced to the field's kind.
    #[error("cannot use {var}={value:?} for field `{field}`: expected {expected}")]
    TypeMismatch {
        /// Record field name.
        field: &'static str,
        /// Environment variable name.
        var: String,
        /// Kind declared by the field.
        expected: FieldKind,
        /// Raw value read from the environment.
        value: String,
    },

    /// `${NAME}` resolution did not settle within the substitution limit.
    #[error("interpolation of {var} did not finish after {limit} substitutions (cyclic reference?)")]
    InterpolationLimit {
        /// Variable whose value was being resolved.
        var: String,
        /// Limit that was hit.
        limit: usize,
    },
}

impl OverlayError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: &'static str,
        var: impl Into<String>,
        expected: FieldKind,
        value: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field,
            var: var.into(),
            expected,
            value: value.into(),
        }
    }
}

/// Failure to turn a string into a field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{value:?} is not a valid {kind}")]
pub struct CoerceError {
    /// Kind that was requested.
    pub kind: FieldKind,
    /// Offending input.
    pub value: String,
}

impl CoerceError {
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_mentions_path() {
        let err = ConfigError::read(
            "/etc/app/config.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/etc/app/config.yaml"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = OverlayError::type_mismatch("app_port", "APP_PORT", FieldKind::Integer, "eighty");
        assert_eq!(
            err.to_string(),
            "cannot use APP_PORT=\"eighty\" for field `app_port`: expected integer"
        );
    }

    #[test]
    fn test_overlay_error_converts() {
        let err: ConfigError = OverlayError::InterpolationLimit {
            var: "A".into(),
            limit: 4,
        }
        .into();
        assert!(matches!(err, ConfigError::Overlay(_)));
        assert!(err.to_string().starts_with("failed to apply environment variables"));
    }

    #[test]
    fn test_validation_helper() {
        let err = ConfigError::validation("field 'app_host' should be provided");
        assert_eq!(
            err.to_string(),
            "invalid configuration: field 'app_host' should be provided"
        );
    }
}
