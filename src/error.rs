//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

/// Boxed error produced by caller-supplied fetch functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// == Cache Error Enum ==
/// Unified error type for the response cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache-only resolve on a key with no live entry
    #[error("Key not cached: {0}")]
    NotCached(String),

    /// Foreground fetch failure with no usable fallback
    #[error("Fetch failed: {0}")]
    Fetch(#[source] BoxError),

    /// Invalid key pattern passed to pattern invalidation
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the response cache.
pub type Result<T> = std::result::Result<T, CacheError>;
