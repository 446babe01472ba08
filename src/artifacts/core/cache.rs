//! Bounded LRU cache for parsed objects
//!
//! Each `Database` owns one cache per object kind. A single mutex guards the
//! recency bookkeeping, so the cache can be shared by any number of threads
//! when the store is embedded in a long-lived host.

use crate::artifacts::objects::object_id::ObjectId;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub struct ObjectCache<T> {
    entries: Mutex<LruCache<ObjectId, Arc<T>>>,
}

impl<T> ObjectCache<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        ObjectCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up an entry and mark it as most recently used
    pub fn get(&self, oid: &ObjectId) -> Option<Arc<T>> {
        self.entries.lock().get(oid).cloned()
    }

    /// Insert an entry, evicting the least recently used one when full
    pub fn insert(&self, oid: ObjectId, object: Arc<T>) {
        self.entries.lock().put(oid, object);
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.entries.lock().contains(oid)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.lock().cap()
    }
}

impl<T> std::fmt::Debug for ObjectCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("ObjectCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
