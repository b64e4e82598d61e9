//! Error types for Bloom filter operations

use thiserror::Error;

/// Result type for Bloom filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors produced by Bloom filter operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Two filters cannot be combined because a sizing parameter differs
    #[error("{parameter} does not match: {ours} != {theirs}")]
    ParameterMismatch {
        /// Name of the mismatched parameter (`m` or `k`)
        parameter: &'static str,
        /// Value held by the receiving filter
        ours: usize,
        /// Value held by the other filter
        theirs: usize,
    },

    /// Restored bit data is inconsistent with the filter parameters
    #[error("invalid filter data: {0}")]
    InvalidData(&'static str),
}

impl FilterError {
    /// Create a parameter mismatch error
    pub const fn parameter_mismatch(parameter: &'static str, ours: usize, theirs: usize) -> Self {
        Self::ParameterMismatch {
            parameter,
            ours,
            theirs,
        }
    }
}
