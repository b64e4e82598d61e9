//! Error types for tree construction, lookup and verification
//!
//! Only configuration problems and failures of the caller's [`Content`]
//! capability are errors. Content that is absent from a tree is reported as
//! `Ok(None)` or `Ok(false)`, and a digest mismatch found while verifying is
//! reported as `Ok(false)`, so callers can tell "inconsistent" apart from
//! "could not compute".
//!
//! [`Content`]: crate::Content

use thicket_bloom::FilterError;
use thiserror::Error;

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors produced by tree operations
#[derive(Error, Debug)]
pub enum TreeError {
    /// A tree cannot be built from an empty content sequence
    #[error("no contents")]
    NoContents,

    /// A Bloom-guided operation was invoked on a tree built without filters
    #[error("bloom filter is disabled")]
    BloomDisabled,

    /// The configured Bloom false positive target is outside `(0, 1)`
    #[error("invalid false positive rate: {0} (expected 0 < p < 1)")]
    InvalidFalsePositiveRate(f64),

    /// Errors from Bloom filter operations
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The caller-supplied content failed to hash or compare itself
    #[error("content error: {0}")]
    Content(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TreeError {
    /// Wrap a failure of the [`Content`](crate::Content) capability
    pub fn content<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Content(Box::new(err))
    }
}
