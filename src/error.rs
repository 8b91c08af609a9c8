// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the evolution core.
//!
//! These cover the setup-time surface only (configuration loading and
//! instance registration). Per-frame calls never return errors: they follow
//! the soft-failure contract and report diagnostics through `tracing`.

use std::fmt;

/// Result type alias for setup-time operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Validation error
    Validation(ValidationError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yml::Error> for Error {
    fn from(e: serde_yml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Validation errors.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Packed-array shape inconsistent with the stated dimension
    Shape {
        what: String,
        expected: usize,
        actual: usize,
    },
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::Shape {
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Shape mismatch for {}: expected {} values, got {}",
                    what, expected, actual
                )
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("bad limit".into());
        assert_eq!(e.to_string(), "Configuration error: bad limit");
    }

    #[test]
    fn test_error_display_validation() {
        let e = Error::Validation(ValidationError::Field {
            field: "dim".into(),
            message: "must be > 0".into(),
        });
        assert_eq!(e.to_string(), "Validation error: Field 'dim': must be > 0");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    #[test]
    fn test_error_display_serialization() {
        let e = Error::Serialization("invalid yaml".into());
        assert_eq!(e.to_string(), "Serialization error: invalid yaml");
    }

    #[test]
    fn test_validation_error_display_shape() {
        let e = ValidationError::Shape {
            what: "hamiltonian".into(),
            expected: 32,
            actual: 30,
        };
        assert_eq!(
            e.to_string(),
            "Shape mismatch for hamiltonian: expected 32 values, got 30"
        );
    }

    #[test]
    fn test_validation_error_display_resource_limit() {
        let e = ValidationError::ResourceLimit {
            resource: "dim".into(),
            limit: 64,
            requested: 128,
        };
        assert_eq!(
            e.to_string(),
            "Resource limit exceeded for dim: limit=64, requested=128"
        );
    }

    #[test]
    fn test_error_source_io() {
        let e = Error::Io(std::io::Error::other("disk"));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_validation() {
        let e = Error::Validation(ValidationError::Field {
            field: "x".into(),
            message: "y".into(),
        });
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_config() {
        let e = Error::Config("x".into());
        assert!(e.source().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
    }

    #[test]
    fn test_from_validation_error() {
        let ve = ValidationError::Field {
            field: "x".into(),
            message: "y".into(),
        };
        let e: Error = ve.into();
        assert!(matches!(e, Error::Validation(_)));
    }

    #[test]
    fn test_from_serde_yml_error() {
        let yaml_err = serde_yml::from_str::<serde_yml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
