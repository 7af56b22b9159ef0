use std::fmt;

/// Counters describing how a cache has been used since it was created.
///
/// Returned as a snapshot by [`LruCache::stats`](crate::LruCache::stats);
/// the counters are updated under the cache's lock, so a snapshot is always
/// consistent with itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found their key.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
    /// `set` calls that created a new entry.
    pub insertions: u64,
    /// `set` calls on a key that was already cached.
    pub updates: u64,
    /// Entries dropped from the tail to make room.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, in `0.0..=1.0`. Zero when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} insertions={} updates={} evictions={} hit_rate={:.2}%",
            self.hits,
            self.misses,
            self.insertions,
            self.updates,
            self.evictions,
            self.hit_rate() * 100.0
        )
    }
}
