//! # Per-Record Locks
//!
//! One async mutex per record id. Different ids never contend. A table
//! entry lives only while someone holds or waits on it, so the table is
//! bounded by in-flight work rather than by every id ever touched.
//!
//! Released on drop (RAII):
//!
//! ```ignore
//! let _guard = locks.acquire(document_id).await;
//! // mutations for `document_id` are serialized until `_guard` drops
//! ```

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of per-record mutexes keyed by `K`.
#[derive(Debug)]
pub struct RecordLocks<K: Eq + Hash> {
    table: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash> Default for RecordLocks<K> {
    fn default() -> Self {
        Self {
            table: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> RecordLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: K) -> RecordGuard<'_, K> {
        let lock = self.table.entry(key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        RecordGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Entries currently in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Exclusive access to one record; evicts the table entry on drop when no
/// one else holds or awaits it.
#[must_use = "the record is unlocked as soon as the guard drops"]
pub struct RecordGuard<'a, K: Eq + Hash> {
    locks: &'a RecordLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash> Drop for RecordGuard<'_, K> {
    fn drop(&mut self) {
        // Release our clone first so the count only reflects other users.
        drop(self.guard.take());
        // Waiters hold their own clone; the shard lock makes the check and
        // the removal atomic against a concurrent `acquire`.
        self.locks
            .table
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
