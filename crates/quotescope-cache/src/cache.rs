use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use tracing::debug;

/// How many quotes the browser keeps around by default
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded in-memory cache with first-in-first-out eviction
///
/// Reads never promote an entry: once a key is the oldest inserted one it is
/// the next to go, no matter how often it was read. Keys are positions within
/// the current filter set, so the owner clears the cache whenever filters change.
#[derive(Debug, Clone)]
pub struct FifoCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    /// A capacity of zero is bumped to one so `put` always has room
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value. Replacing an existing key keeps its original slot in
    /// the eviction order; a new key at capacity evicts the oldest entry first.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                debug!("Cache full, evicted {:?}", oldest);
                evicted = Some(oldest);
            }
        }

        self.order.push_back(key);
        self.entries.insert(key, value);
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest insertion
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
