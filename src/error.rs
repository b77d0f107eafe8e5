//! Error types for Wearwatch
//!
//! This module defines all error types used by the scoring core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Wearwatch operations
pub type Result<T> = std::result::Result<T, WearwatchError>;

/// Main error type for Wearwatch operations
#[derive(Error, Debug)]
pub enum WearwatchError {
    /// Scoring error
    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    /// Configuration error (artifacts, schema)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Manual input error
    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

/// Errors raised while turning features into a failure probability
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Vector length does not match what the classifier was trained on
    #[error("Feature count mismatch: classifier expects {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// A feature value is NaN or infinite
    #[error("Non-finite value for feature {name}: {value}")]
    NonFiniteFeature { name: String, value: f64 },

    /// Classifier returned something that is not a probability
    #[error("Classifier returned {0}, expected a probability in [0, 1]")]
    ProbabilityOutOfRange(f64),

    /// Classifier could not be evaluated
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading or validating startup artifacts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Artifact file could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for its type
    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Model artifact is structurally invalid
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Feature schema is empty
    #[error("Feature schema is empty")]
    EmptySchema,

    /// Feature schema lists the same name twice
    #[error("Duplicate feature name in schema: {0}")]
    DuplicateFeature(String),

    /// Schema and classifier disagree on vector length
    #[error("Schema has {schema} features but the model expects {model}")]
    SchemaMismatch { schema: usize, model: usize },
}

/// Errors on manual what-if input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Value outside the accepted range for a field
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Unknown product type code
    #[error("Unknown product type: {0}")]
    UnknownProductType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WearwatchError::Score(ScoreError::FeatureCountMismatch {
            expected: 9,
            actual: 7,
        });
        let msg = format!("{}", err);
        assert!(msg.contains("expects 9"));
        assert!(msg.contains("got 7"));
    }

    #[test]
    fn test_error_conversion() {
        let input_err = InputError::UnknownProductType("X".to_string());
        let err: WearwatchError = input_err.into();
        assert!(matches!(err, WearwatchError::Input(_)));
    }

    #[test]
    fn test_config_error_mentions_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("/models/xgb_model.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("xgb_model.json"));
    }
}
