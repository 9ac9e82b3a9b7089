//! Error types
//!
//! Progression failures are local and synchronous: every call either
//! returns a full result or one of these.

use thiserror::Error;

/// Errors raised by the progression calculator and event detector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    /// Caller passed a value that can never be valid (negative XP, XP regression, level 0)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// XP arithmetic would leave the representable range
    #[error("XP overflow: {current} + {delta} exceeds {max}", max = i64::MAX)]
    Overflow { current: i64, delta: i64 },

    /// A catalog table is malformed (gap, unordered rows, bad id)
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProgressionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ProgressionError::InvalidArgument(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ProgressionError::Configuration(msg.into())
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressionError::InvalidArgument(_) => "invalid_argument",
            ProgressionError::Overflow { .. } => "overflow",
            ProgressionError::Configuration(_) => "configuration",
        }
    }
}

/// Errors raised while loading or exporting catalog data files
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ProgressionError),
}

/// Convenience alias for progression results
pub type Result<T> = std::result::Result<T, ProgressionError>;
