//! Error types for qtsp.
//!
//! Every fallible operation returns `Result<T, TspError>`; nothing in the
//! library panics on bad input.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for qtsp operations.
pub type TspResult<T> = Result<T, TspError>;

/// Reasons a cost matrix or solver parameter is rejected.
///
/// Validation errors are caller mistakes: they are always surfaced and never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fewer than three cities.
    #[error("instance needs at least 3 cities, got {n}")]
    TooFewCities {
        /// Number of rows supplied.
        n: usize,
    },

    /// A row does not have `n` columns.
    #[error("matrix is not square: row {row} has {got} columns, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Expected column count (number of rows).
        expected: usize,
        /// Actual column count.
        got: usize,
    },

    /// `cost[i][i] != 0`.
    #[error("diagonal entry cost[{i}][{i}] = {value}, expected 0")]
    NonZeroDiagonal {
        /// City index.
        i: usize,
        /// Value found on the diagonal.
        value: i64,
    },

    /// `cost[i][j] < 0`.
    #[error("negative weight cost[{i}][{j}] = {value}")]
    NegativeWeight {
        /// Row.
        i: usize,
        /// Column.
        j: usize,
        /// Offending value.
        value: i64,
    },

    /// `cost[i][j] != cost[j][i]`.
    #[error("asymmetric matrix: cost[{i}][{j}] = {forward} != cost[{j}][{i}] = {backward}")]
    Asymmetric {
        /// Row.
        i: usize,
        /// Column.
        j: usize,
        /// `cost[i][j]`.
        forward: i64,
        /// `cost[j][i]`.
        backward: i64,
    },

    /// Quantum threshold below 1.
    #[error("quantum threshold must be at least 1, got {threshold}")]
    InvalidThreshold {
        /// Threshold supplied.
        threshold: i64,
    },

    /// Matrix size disagrees with the declared city list.
    #[error("instance declares {cities} cities but the matrix has {rows} rows")]
    CityCountMismatch {
        /// Cities declared.
        cities: usize,
        /// Matrix rows.
        rows: usize,
    },
}

/// Unified error type for all qtsp operations.
#[derive(Debug, Error)]
pub enum TspError {
    // ===== Caller errors =====
    /// Malformed matrix or out-of-range parameter.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Instance too large for the selected algorithm.
    #[error("{algorithm}: {n} cities exceeds the limit of {limit}")]
    ResourceLimitExceeded {
        /// Algorithm that refused the instance.
        algorithm: &'static str,
        /// City count of the instance.
        n: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// Caller-supplied time budget exhausted.
    #[error("{algorithm}: time budget of {budget:?} exceeded after {elapsed:?}")]
    TimeoutExceeded {
        /// Algorithm that was aborted.
        algorithm: &'static str,
        /// Budget supplied by the caller.
        budget: Duration,
        /// Time spent before aborting.
        elapsed: Duration,
    },

    /// Algorithm name not recognised.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error on a configuration struct.
    #[error("Configuration validation error: {0}")]
    ConfigValidation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TspError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Short machine-readable category, used in API error bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::UnknownAlgorithm(_) => "validation",
            Self::ResourceLimitExceeded { .. } => "resource_limit_exceeded",
            Self::TimeoutExceeded { .. } => "timeout_exceeded",
            Self::Config { .. } | Self::YamlParse(_) | Self::ConfigValidation(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether a comparison may skip the failing algorithm and carry on.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::ResourceLimitExceeded { .. } | Self::TimeoutExceeded { .. }
        )
    }
}
