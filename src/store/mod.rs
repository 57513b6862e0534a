//! Store Module
//!
//! In-memory, insertion-ordered key-value map.
//!
//! ## Responsibilities
//! - O(1) point lookup, insert/update and delete
//! - Iteration in first-insertion order
//! - A single exclusive-access gate shared by all dispatcher workers
//!
//! ## Data Structure Choice
//! Arena of slots linked by index (prev/next) plus a hash index key → slot:
//! - Removal from the middle of the order is O(1) (unlink one slot)
//! - Slot indices never shift, so the index stays valid across unrelated
//!   insertions and removals
//! - No reference cycles between nodes
//!
//! ```text
//!   index: HashMap<K, usize>
//!        │
//!        ▼
//!   slots: [ 0: a ] ⇄ [ 2: c ] ⇄ [ 3: d ]      free: [1]
//!            head                  tail
//! ```

mod ordered;
mod shared;

pub use ordered::{Iter, OrderedStore};
pub use shared::SharedStore;

/// A stored key/value record
///
/// The key is fixed once the entry exists; the value is replaced in place by
/// [`OrderedStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Split into `(key, value)`
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}
