use crate::config::{CacheConfig, OverwritePolicy};
use crate::error::Result;
use crate::list::{Handle, RecencyList};
use crate::stats::CacheStats;
use log::{debug, trace};
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::num::NonZeroUsize;

/// The behaviour shared by the cache implementations in this crate.
///
/// Every method takes `&self`: implementations synchronise internally, so a
/// cache can be shared across threads behind an `Arc` without extra locking.
///
/// # Type Parameters
///
/// * `K` - The key type. Must implement `Hash + Eq + Clone + Send`
/// * `V` - The value type. Must implement `Clone + Send`; values are handed
///   back to callers as copies
pub trait Cache<K, V>: Send + Sync
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Retrieves a value from the cache by its key.
    ///
    /// A hit marks the entry as most recently used. A miss has no side
    /// effect besides being counted.
    ///
    /// # Returns
    ///
    /// * `Some(V)` if the key exists
    /// * `None` if the key doesn't exist
    fn get(&self, key: &K) -> Option<V>;

    /// Inserts a key-value pair into the cache, making it the most recently
    /// used entry.
    ///
    /// If the cache is full and the key is new, the least recently used
    /// entry is evicted first.
    fn set(&self, key: K, value: V);

    /// Reads a value without changing recency order.
    fn peek(&self, key: &K) -> Option<V>;

    /// Returns true if the key is cached. Does not change recency order.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache holds.
    fn capacity(&self) -> usize;
}

// Everything the guard protects. Index, list and counters change together.
struct State<K, V> {
    index: HashMap<K, Handle>,
    list: RecencyList<K, V>,
    stats: CacheStats,
}

/// A fixed-capacity LRU cache guarded by a single mutex.
///
/// A `HashMap` maps each key to a slot in an arena-backed doubly linked
/// list that keeps entries ordered from most to least recently used. Both
/// `get` and `set` run in O(1) expected time. Reads reorder the list, so
/// every operation takes the lock exclusively; there is no read/write split.
///
/// # Type Parameters
///
/// * `K` - The key type. Must implement `Hash + Eq + Clone`
/// * `V` - The value type. Opaque to the cache; `get` and `peek` additionally
///   need `V: Clone`, while [`get_with`](Self::get_with) works for any `V`
///
/// # Examples
///
/// ```rust
/// use guarded_lru::LruCache;
///
/// let cache = LruCache::new(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get(&"a"), Some(1));
///
/// // "b" is now the least recently used entry
/// cache.set("c", 3);
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.keys(), vec!["c", "a"]);
/// ```
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    overwrite_policy: OverwritePolicy,
    state: Mutex<State<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Existing keys are overwritten by `set` ([`OverwritePolicy::Replace`]).
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0. Use [`try_new`](Self::try_new) to get an
    /// error instead.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates an empty cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Creates an empty cache from a full configuration.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let capacity = config.validate()?;
        let overwrite_policy = config.overwrite_policy();
        debug!(
            "creating LRU cache with capacity {} and {:?} overwrite policy",
            capacity, overwrite_policy
        );
        Ok(Self {
            capacity,
            overwrite_policy,
            state: Mutex::new(State {
                index: HashMap::with_capacity(capacity.get()),
                list: RecencyList::with_capacity(capacity.get()),
                stats: CacheStats::default(),
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite_policy
    }

    /// Looks up `key` and, on a hit, promotes it and passes the value to `f`.
    ///
    /// `f` runs while the lock is held, so it should be short.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let mut state = self.state.lock();
        let state = &mut *state;
        match state.index.get(key) {
            Some(&handle) => {
                state.list.move_to_front(handle);
                state.stats.hits += 1;
                Some(f(state.list.value(handle)))
            }
            None => {
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Retrieves a copy of the value for `key`, promoting it on a hit.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Inserts or refreshes `key` as the most recently used entry.
    ///
    /// On an existing key the stored value is handled according to the
    /// cache's [`OverwritePolicy`]. On a new key with the cache full, the
    /// least recently used entry is evicted first, so the entry count never
    /// exceeds the capacity.
    pub fn set(&self, key: K, value: V) {
        // Displaced values are dropped after the guard is released
        let _displaced = {
            let mut state = self.state.lock();
            self.set_locked(&mut state, key, value)
        };
    }

    fn set_locked(&self, state: &mut State<K, V>, key: K, value: V) -> Option<V> {
        if let Some(&handle) = state.index.get(&key) {
            state.list.move_to_front(handle);
            state.stats.updates += 1;
            return match self.overwrite_policy {
                OverwritePolicy::Replace => Some(mem::replace(state.list.value_mut(handle), value)),
                OverwritePolicy::Retain => Some(value),
            };
        }

        let mut evicted = None;
        if state.list.len() >= self.capacity.get() {
            if let Some((old_key, old_value)) = state.list.pop_back() {
                state.index.remove(&old_key);
                state.stats.evictions += 1;
                trace!(
                    "evicted least recently used entry ({} evictions so far)",
                    state.stats.evictions
                );
                evicted = Some(old_value);
            }
        }

        let handle = state.list.push_front(key.clone(), value);
        state.index.insert(key, handle);
        state.stats.insertions += 1;
        evicted
    }

    /// Retrieves a copy of the value for `key` without promoting it.
    ///
    /// Peeks are not counted as hits or misses.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let state = self.state.lock();
        state
            .index
            .get(key)
            .map(|&handle| state.list.value(handle).clone())
    }

    /// Returns true if `key` is cached, without promoting it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().index.contains_key(key)
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.state.lock().list.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cached keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        let state = self.state.lock();
        state.list.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let state = self.state.lock();
        state.list.check_links();
        assert_eq!(state.index.len(), state.list.len(), "index and list disagree");
        assert_eq!(state.list.occupied_slots(), state.list.len(), "orphaned nodes");
        assert!(state.list.len() <= self.capacity.get(), "over capacity");
        for (key, &handle) in &state.index {
            assert!(state.list.key(handle) == key, "index points at the wrong node");
        }
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        self.get(key)
    }

    fn set(&self, key: K, value: V) {
        self.set(key, value)
    }

    fn peek(&self, key: &K) -> Option<V> {
        self.peek(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains(key)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.state.lock().list.len())
            .field("overwrite_policy", &self.overwrite_policy)
            .finish()
    }
}
