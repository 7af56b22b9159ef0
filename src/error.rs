use thiserror::Error;

/// Result alias for fallible cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised when a cache is built with arguments outside its contract.
///
/// Lookups never fail: a missing key is an ordinary `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested capacity cannot hold a single entry.
    #[error("invalid cache capacity {0}: capacity must be at least 1")]
    InvalidCapacity(usize),
}
