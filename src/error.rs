//! Error types for the mining pipeline.

use thiserror::Error;

/// Result type for mining operations.
pub type Result<T> = std::result::Result<T, MinerError>;

/// Errors that can occur while configuring or running the miner.
#[derive(Error, Debug)]
pub enum MinerError {
    /// A threshold or length parameter is outside its valid range.
    ///
    /// Raised before any mining pass runs; the computation is never started
    /// with invalid parameters.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An internal invariant of the miner's output was violated.
    ///
    /// Every subset of a frequent itemset must itself be present in the
    /// frequent itemset table. Seeing this error means a bug in the mining
    /// pass, not a recoverable input condition.
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl MinerError {
    /// Creates an invalid parameter error with the given message.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates an invariant violation error with the given message.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
