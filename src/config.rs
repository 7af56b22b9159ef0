use crate::error::{CacheError, Result};
use std::num::NonZeroUsize;

/// What `set` does with the new value when the key is already cached.
///
/// Either way the entry is promoted to most-recently-used and the entry
/// count does not change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverwritePolicy {
    /// Store the new value in place of the old one.
    #[default]
    Replace,
    /// Keep the value already cached and drop the new one.
    Retain,
}

/// Construction parameters for an [`LruCache`](crate::LruCache).
///
/// # Examples
///
/// ```rust
/// use guarded_lru::{CacheConfig, LruCache, OverwritePolicy};
///
/// let config = CacheConfig::new(128).with_overwrite_policy(OverwritePolicy::Retain);
/// let cache: LruCache<u64, String> = LruCache::with_config(config).unwrap();
/// assert_eq!(cache.capacity(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    capacity: usize,
    overwrite_policy: OverwritePolicy,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            overwrite_policy: OverwritePolicy::default(),
        }
    }

    pub fn with_overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite_policy = policy;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite_policy
    }

    /// Checks the capacity and returns it in its non-zero form.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or(CacheError::InvalidCapacity(self.capacity))
    }
}
