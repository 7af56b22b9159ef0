//! A fixed-capacity, thread-safe LRU (Least Recently Used) cache.
//!
//! [`LruCache`] holds at most `capacity` entries. Reading or writing a key
//! makes it the most recently used entry; inserting a new key into a full
//! cache evicts the least recently used one. All operations go through a
//! single mutex, so a cache can be shared between threads behind an `Arc`.
//!
//! # Features
//!
//! - O(1) expected-time `get` and `set`
//! - No unsafe code: the recency list is an arena addressed by index
//! - Configurable handling of `set` on an existing key ([`OverwritePolicy`])
//! - Hit/miss/eviction counters ([`CacheStats`])
//! - Generic keys and fully opaque values
//!
//! # Examples
//!
//! ```rust
//! use guarded_lru::LruCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache: Arc<LruCache<u64, String>> = Arc::new(LruCache::new(1000));
//! cache.set(42, "answer".to_string());
//!
//! let reader = Arc::clone(&cache);
//! thread::spawn(move || {
//!     assert_eq!(reader.get(&42), Some("answer".to_string()));
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(cache.stats().hits, 1);
//! ```

#![forbid(unsafe_code)]

mod config;
mod error;
mod list;
pub mod lru_cache;
mod stats;

pub use config::{CacheConfig, OverwritePolicy};
pub use error::{CacheError, Result};
pub use lru_cache::{Cache, LruCache};
pub use stats::CacheStats;
