//! Unified error types for rulewatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from rule registry operations
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error from input validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the rule store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error reading host metrics
    #[error("Sampling error: {0}")]
    Sample(#[from] SampleError),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error
    ///
    /// Client-class failures (bad input, unknown rule) exit with 2,
    /// everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 2,
            AppError::Registry(RegistryError::Persistence(_)) => 1,
            AppError::Registry(_) => 2,
            _ => 1,
        }
    }
}

/// Errors from validating caller-supplied values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Threshold outside the 0-100 percent range
    #[error("Invalid {field} threshold: {value} (must be 0-100)")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    /// Event body is not a flat object of scalar values
    #[error("Malformed event: {0}")]
    MalformedEvent(String),
}

/// Errors from rule registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A rule with this id already exists
    #[error("Rule already exists: {0}")]
    DuplicateId(String),

    /// No rule with this id
    #[error("Rule not found: {0}")]
    NotFound(String),

    /// Rule failed validation
    #[error("Invalid rule: {0}")]
    Invalid(#[from] ValidationError),

    /// Backing store failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// Errors from the rule persistence backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store file could not be read or written
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored table could not be encoded or decoded
    #[error("Store encoding error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Store is not reachable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A row with this id is already stored
    #[error("Stored row already exists: {0}")]
    Conflict(String),

    /// No stored row with this id
    #[error("Stored row not found: {0}")]
    Missing(String),

    /// A stored row is invalid or repeats an id
    #[error("Invalid stored row: {0}")]
    InvalidRecord(String),
}

/// Errors from evaluating a rule condition
///
/// These never leave the engine: a failing condition counts as no match.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Condition text could not be parsed
    #[error("Failed to parse condition: {0}")]
    Parse(String),

    /// Condition could not be evaluated against the event
    #[error("Failed to evaluate condition: {0}")]
    Evaluate(String),
}

/// Errors from executing an action
#[derive(Error, Debug)]
pub enum ActionError {
    /// Handler failed to perform the side effect
    #[error("Action '{kind}' failed: {message}")]
    ExecutionFailed { kind: String, message: String },
}

/// Errors from reading host metrics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// Metric source could not produce a reading
    #[error("Metric source unavailable: {0}")]
    Unavailable(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Config file could not be read or written
    #[error("Configuration IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_error_display() {
        let err = ValidationError::ThresholdOutOfRange {
            field: "cpu",
            value: 150.0,
        };
        assert_eq!(err.to_string(), "Invalid cpu threshold: 150 (must be 0-100)");
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::NotFound("r1".to_string());
        assert_eq!(err.to_string(), "Rule not found: r1");
    }

    #[test]
    fn test_error_conversion() {
        let store_err = StoreError::Unavailable("locked".to_string());
        let registry_err: RegistryError = store_err.into();
        assert!(matches!(registry_err, RegistryError::Persistence(_)));

        let app_err: AppError = registry_err.into();
        assert!(matches!(app_err, AppError::Registry(_)));
    }

    #[test]
    fn test_exit_codes() {
        let not_found: AppError = RegistryError::NotFound("x".to_string()).into();
        assert_eq!(not_found.exit_code(), 2);

        let invalid: AppError = ValidationError::EmptyField("id").into();
        assert_eq!(invalid.exit_code(), 2);

        let persistence: AppError =
            RegistryError::Persistence(StoreError::Unavailable("down".to_string())).into();
        assert_eq!(persistence.exit_code(), 1);
    }
}
