//! Shared store
//!
//! The single store instance all dispatcher workers apply commands to.

use parking_lot::Mutex;

use super::{Entry, OrderedStore};

/// An [`OrderedStore`] of strings behind one exclusive lock
///
/// ## Concurrency
/// - Every operation, reads included, holds the lock for its whole duration
/// - Traversals ([`for_each_in_order`](Self::for_each_in_order),
///   [`snapshot`](Self::snapshot)) hold the lock from first to last entry, so
///   a listing never interleaves with a put or remove
/// - Share it with `Arc<SharedStore>`
#[derive(Default)]
pub struct SharedStore {
    inner: Mutex<OrderedStore<String, String>>,
}

impl SharedStore {
    /// Create an empty shared store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for `key`, cloned out of the lock
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    /// Insert or update `key`; returns the previous value if any
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.lock().put(key.into(), value.into())
    }

    /// Remove `key`; returns its value if it was live
    pub fn remove(&self, key: &str) -> Option<String> {
        self.inner.lock().remove(key)
    }

    pub fn front(&self) -> Option<Entry<String, String>> {
        self.inner.lock().front().cloned()
    }

    pub fn back(&self) -> Option<Entry<String, String>> {
        self.inner.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Visit every entry front to back while holding the lock
    ///
    /// Returns the number of entries visited.
    pub fn for_each_in_order<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&Entry<String, String>),
    {
        let store = self.inner.lock();
        let mut visited = 0;
        for entry in store.iter() {
            f(entry);
            visited += 1;
        }
        visited
    }

    /// Copy of all entries in order, taken under one lock acquisition
    pub fn snapshot(&self) -> Vec<Entry<String, String>> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Run `f` with shared access to the store
    pub fn with<R>(&self, f: impl FnOnce(&OrderedStore<String, String>) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Run `f` with exclusive access to the store
    ///
    /// Several operations inside one call apply atomically.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut OrderedStore<String, String>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
