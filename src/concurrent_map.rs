//! Sharded concurrent map
//!
//! Keys are routed to a fixed number of independently locked buckets so
//! that many worker threads can mutate disjoint entries without
//! contending on a single lock.

use std::collections::BTreeMap;

use parking_lot::{Mutex, MutexGuard};

use crate::models::DocumentId;

type Shard<V> = BTreeMap<DocumentId, V>;

/// Document-id keyed map sharded into independently locked buckets
pub struct ConcurrentMap<V> {
    shards: Vec<Mutex<Shard<V>>>,
}

/// Scoped write access to a single entry.
///
/// Holds the owning shard's lock until dropped. A thread must not hold
/// two handles into the same shard at once.
pub struct Access<'a, V> {
    guard: MutexGuard<'a, Shard<V>>,
    key: DocumentId,
}

impl<V: Default> Access<'_, V> {
    /// Mutable reference to the entry, default-constructed if absent
    pub fn value(&mut self) -> &mut V {
        self.guard.entry(self.key).or_default()
    }
}

impl<V: Default> ConcurrentMap<V> {
    /// Create a map with `bucket_count` shards (clamped to at least one)
    pub fn new(bucket_count: usize) -> Self {
        let mut shards = Vec::with_capacity(bucket_count.max(1));
        shards.resize_with(bucket_count.max(1), || Mutex::new(BTreeMap::new()));
        Self { shards }
    }

    pub fn bucket_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: DocumentId) -> &Mutex<Shard<V>> {
        let index = key.rem_euclid(self.shards.len() as DocumentId) as usize;
        &self.shards[index]
    }

    /// Lock the shard owning `key` and return an access handle to it
    pub fn at(&self, key: DocumentId) -> Access<'_, V> {
        Access {
            guard: self.shard_for(key).lock(),
            key,
        }
    }

    /// Remove `key` from its shard, if present
    pub fn erase(&self, key: DocumentId) {
        self.shard_for(key).lock().remove(&key);
    }

    /// Drain every shard into a single flat ordered map
    pub fn build_ordinary_map(self) -> BTreeMap<DocumentId, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.extend(shard.into_inner());
        }
        merged
    }
}
