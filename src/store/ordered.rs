//! OrderedStore implementation
//!
//! Hash index over an index-linked arena of slots.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use super::Entry;

/// One occupied arena slot
struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Insertion-ordered map with O(1) get/put/remove
///
/// ## Ordering rules
/// - A new key is appended at the back
/// - Updating a live key keeps its position
/// - Removing a key and putting it again appends it at the current back
///
/// Not synchronized: callers sharing one store across threads go through
/// [`SharedStore`](super::SharedStore).
pub struct OrderedStore<K, V> {
    /// Key → slot holding its entry
    index: HashMap<K, usize>,

    /// Arena; `None` marks a freed slot
    slots: Vec<Option<Node<K, V>>>,

    /// Freed slots, reused before the arena grows
    free: Vec<usize>,

    /// First slot in insertion order
    head: Option<usize>,

    /// Last slot in insertion order
    tail: Option<usize>,
}

impl<K, V> OrderedStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty store with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Current value for `key`, if live
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_entry(key).map(Entry::value)
    }

    /// Entry for `key`, if live
    pub fn get_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.node(slot).map(|node| &node.entry)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Insert or update a key
    ///
    /// Returns the previous value when the key was already live; its
    /// position is left untouched in that case.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&slot) = self.index.get(&key) {
            if let Some(node) = self.node_mut(slot) {
                return Some(std::mem::replace(&mut node.entry.value, value));
            }
        }

        let slot = self.push_back(Entry::new(key.clone(), value));
        self.index.insert(key, slot);
        None
    }

    /// Remove a key, returning its value if it was live
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        self.unlink(slot).map(|node| node.entry.value)
    }

    /// First entry in insertion order
    pub fn front(&self) -> Option<&Entry<K, V>> {
        self.head.and_then(|slot| self.node(slot)).map(|node| &node.entry)
    }

    /// Last entry in insertion order
    pub fn back(&self) -> Option<&Entry<K, V>> {
        self.tail.and_then(|slot| self.node(slot)).map(|node| &node.entry)
    }

    /// Start a traversal from the current front
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            store: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop every entry and release the arena
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    // =========================================================================
    // Arena Helpers
    // =========================================================================

    fn node(&self, slot: usize) -> Option<&Node<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Store `entry` in a free slot (or a new one) and link it at the tail
    fn push_back(&mut self, entry: Entry<K, V>) -> usize {
        let node = Node {
            entry,
            prev: self.tail,
            next: None,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(tail_node) = self.node_mut(tail) {
                    tail_node.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);

        slot
    }

    /// Detach one slot from the order and free it
    ///
    /// Touches only the slot and its two neighbours.
    fn unlink(&mut self, slot: usize) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(slot)?.take()?;

        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.node_mut(prev) {
                    prev_node.next = node.next;
                }
            }
            None => self.head = node.next,
        }

        match node.next {
            Some(next) => {
                if let Some(next_node) = self.node_mut(next) {
                    next_node.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(slot);
        Some(node)
    }
}

impl<K, V> Default for OrderedStore<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for OrderedStore<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|entry| (entry.key(), entry.value())))
            .finish()
    }
}

impl<K, V> Extend<(K, V)> for OrderedStore<K, V>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedStore<K, V>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedStore<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = &'a Entry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Front-to-back traversal over an [`OrderedStore`]
///
/// Single pass; dropping it early is fine.
pub struct Iter<'a, K, V> {
    store: &'a OrderedStore<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.store.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> where K: Hash + Eq + Clone {}

impl<K, V> FusedIterator for Iter<'_, K, V> where K: Hash + Eq + Clone {}
