//! Error types for alarm resolution and template generation.

use crate::types::Method;
use thiserror::Error;

/// Result type alias for monitoring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Inconsistent alarm declaration, raised while resolving parameters.
///
/// Fatal for the alarm that raised it; the whole build stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Latency alarms aggregate at most five methods
    #[error("methods must be 5 or fewer for latency statistics (got {count})")]
    TooManyLatencyMethods { count: usize },

    /// Statistic override used on a non-latency metric
    #[error("latency statistic override only valid for latency metric (got {metric})")]
    LatencyStatisticWithoutLatencyMetric { metric: String },

    /// Statistic override used with a method list
    #[error("latency statistic override requires exactly one method")]
    LatencyStatisticRequiresSingleMethod,

    /// Method list resolved to nothing
    #[error("at least one method is required for resource {resource}")]
    EmptyMethods { resource: String },

    /// Same method listed twice; query ids would collide
    #[error("method {method} listed more than once for resource {resource}")]
    DuplicateMethod { resource: String, method: Method },

    /// Anomaly band width must be a finite, non-negative number
    #[error("n_stds must be a finite number >= 0 (got {value})")]
    InvalidNStds { value: String },
}

/// Error types for monitoring operations
#[derive(Debug, Error)]
pub enum Error {
    /// Alarm validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Logical id already present in the template
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// Unknown resource reference
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::InvalidConfiguration(errors.to_string())
    }
}
