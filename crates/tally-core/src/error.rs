//! Shared error type across tally crates.

use thiserror::Error;

/// Stable error kinds (used by exposer responses and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Metric name does not match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    InvalidMetricName,
    /// Label name does not match `[a-zA-Z_][a-zA-Z0-9_]*` or is reserved.
    InvalidLabelName,
    /// Histogram bounds are not strictly ascending.
    InvalidBuckets,
    /// Exposer configuration rejected.
    BadConfig,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorKind::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorKind::InvalidBuckets => "INVALID_BUCKETS",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Unified error type used by core and exposer.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name: {0:?}")]
    InvalidLabelName(String),
    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::InvalidMetricName(_) => ErrorKind::InvalidMetricName,
            TallyError::InvalidLabelName(_) => ErrorKind::InvalidLabelName,
            TallyError::InvalidBuckets(_) => ErrorKind::InvalidBuckets,
            TallyError::BadConfig(_) => ErrorKind::BadConfig,
            TallyError::Internal(_) => ErrorKind::Internal,
        }
    }
}
