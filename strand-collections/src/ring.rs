//! Circular doubly linked list over external storage.
//!
//! Every list owns one payload-free sentinel node. The sentinel and the
//! element nodes form a ring: walking `next` from the sentinel visits every
//! element and comes back to the sentinel, walking `prev` visits them in
//! reverse. An empty list is a sentinel linked to itself.
//!
//! ```text
//!        ┌──────────────────────────────────────┐
//!        ▼                                      │
//!   ┌─────────┐ next ┌───┐ next ┌───┐ next ┌───┐ │
//!   │sentinel │─────▶│ a │─────▶│ b │─────▶│ c │─┘
//!   └─────────┘◀─────└───┘◀─────└───┘◀─────└───┘
//!        │      prev       prev       prev   ▲
//!        └───────────────────────────────────┘
//! ```
//!
//! Nodes live in storage and are addressed by [`Key`]. A node that belongs
//! to no list is *detached*: its links point at itself. Unlinking a node
//! returns it to that state, so it can be linked into another list (or the
//! same one) without reallocation.
//!
//! # Storage Invariant
//!
//! A list must always be used with the storage it was created in. Several
//! lists may share one storage. Passing a key that names a node of another
//! list is a caller error; link operations panic on keys that are not in
//! storage at all.
//!
//! # Example
//!
//! ```
//! use strand_collections::{GrowableRingStorage, RingList};
//!
//! let mut storage: GrowableRingStorage<u64> = GrowableRingStorage::new();
//! let mut list = RingList::try_new(&mut storage).unwrap();
//!
//! let a = list.try_push_back(&mut storage, 1).unwrap();
//! let _b = list.try_push_back(&mut storage, 2).unwrap();
//! list.try_push_front(&mut storage, 0).unwrap();
//!
//! let values: Vec<_> = list.iter(&storage).copied().collect();
//! assert_eq!(values, vec![0, 1, 2]);
//!
//! assert_eq!(list.remove(&mut storage, a), Some(1));
//! assert!(list.validate(&storage));
//!
//! list.release(&mut storage);
//! ```
//!
//! # Moving Between Lists
//!
//! ```
//! use strand_collections::{GrowableRingStorage, RingList};
//!
//! let mut storage: GrowableRingStorage<&str> = GrowableRingStorage::new();
//! let mut ready = RingList::try_new(&mut storage).unwrap();
//! let mut blocked = RingList::try_new(&mut storage).unwrap();
//!
//! let task = ready.try_push_back(&mut storage, "io").unwrap();
//!
//! ready.unlink(&mut storage, task);
//! blocked.link_back(&mut storage, task);
//!
//! assert!(ready.is_empty());
//! assert_eq!(blocked.get(&storage, task), Some(&"io"));
//! ```

use std::marker::PhantomData;

use crate::{BoxedStorage, Error, GrowableStorage, Key, Storage, TryPushError};

/// Fixed-capacity storage for ring list nodes. Each list's sentinel takes a slot.
pub type BoxedRingStorage<T, K = u32> = BoxedStorage<RingNode<T, K>, K>;

/// Growable storage for ring list nodes.
pub type GrowableRingStorage<T, K = u32> = GrowableStorage<RingNode<T, K>, K>;

/// `slab::Slab` storage for ring list nodes.
#[cfg(feature = "slab")]
pub type SlabRingStorage<T> = slab::Slab<RingNode<T, usize>>;

/// A node in the ring: payload plus two links.
///
/// The payload is `None` only for a list's sentinel.
#[derive(Debug)]
pub struct RingNode<T, K: Key = u32> {
    data: Option<T>,
    prev: K,
    next: K,
}

impl<T, K: Key> RingNode<T, K> {
    #[inline]
    fn new(data: Option<T>) -> Self {
        Self {
            data,
            prev: K::NONE,
            next: K::NONE,
        }
    }
}

/// A circular doubly linked list with a sentinel, over external storage.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Storage type (e.g., [`GrowableRingStorage<T>`])
/// - `K`: Key type (default `u32`)
///
/// Dropping a list without [`release`](Self::release) leaves its nodes and
/// sentinel in storage.
#[derive(Debug)]
pub struct RingList<T, S, K: Key = u32>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    head: K,
    len: usize,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> RingList<T, S, K>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    /// Creates an empty list, allocating its sentinel in `storage`.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] or [`Error::AllocationFailure`] if the storage
    /// has no room for the sentinel.
    pub fn try_new(storage: &mut S) -> Result<Self, Error> {
        let head = storage.try_insert(RingNode::new(None))?;
        let sentinel = Self::node_mut(storage, head);
        sentinel.prev = head;
        sentinel.next = head;

        Ok(Self {
            head,
            len: 0,
            _marker: PhantomData,
        })
    }

    /// Frees every node, then the sentinel.
    pub fn release(mut self, storage: &mut S) {
        self.clear(storage);
        storage.remove(self.head);
    }

    #[inline]
    fn node(storage: &S, key: K) -> &RingNode<T, K> {
        storage.get(key).expect("invalid key")
    }

    #[inline]
    fn node_mut(storage: &mut S, key: K) -> &mut RingNode<T, K> {
        storage.get_mut(key).expect("invalid key")
    }

    /// Places `key` between the adjacent nodes `prev` and `next`.
    #[inline]
    fn splice_in(storage: &mut S, key: K, prev: K, next: K) {
        Self::node_mut(storage, next).prev = key;
        let node = Self::node_mut(storage, key);
        node.prev = prev;
        node.next = next;
        Self::node_mut(storage, prev).next = key;
    }

    /// Makes `prev` and `next` adjacent, dropping whatever sat between them.
    #[inline]
    fn bridge(storage: &mut S, prev: K, next: K) {
        Self::node_mut(storage, next).prev = prev;
        Self::node_mut(storage, prev).next = next;
    }

    #[inline]
    fn detach(storage: &mut S, key: K) {
        let node = Self::node_mut(storage, key);
        node.prev = key;
        node.next = key;
    }

    #[inline]
    fn first(&self, storage: &S) -> K {
        Self::node(storage, self.head).next
    }

    #[inline]
    fn last(&self, storage: &S) -> K {
        Self::node(storage, self.head).prev
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the list holds exactly one element.
    #[inline]
    pub const fn is_singular(&self) -> bool {
        self.len == 1
    }

    /// Returns the sentinel's key.
    ///
    /// Usable as the `at` argument of [`link_after`](Self::link_after) and
    /// [`link_before`](Self::link_before).
    #[inline]
    pub const fn head_key(&self) -> K {
        self.head
    }

    /// Returns `true` if `key` is the last element.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn is_last(&self, storage: &S, key: K) -> bool {
        key != self.head && Self::node(storage, key).next == self.head
    }

    /// Returns `true` if `key` is linked into no list.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn is_detached(&self, storage: &S, key: K) -> bool {
        Self::node(storage, key).next == key
    }

    /// Returns the first element's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self, storage: &S) -> Option<K> {
        let first = self.first(storage);
        (first != self.head).then_some(first)
    }

    /// Returns the last element's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self, storage: &S) -> Option<K> {
        let last = self.last(storage);
        (last != self.head).then_some(last)
    }

    /// Returns the key after `key`, or `None` if `key` is last.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn next_key(&self, storage: &S, key: K) -> Option<K> {
        let next = Self::node(storage, key).next;
        (next != self.head).then_some(next)
    }

    /// Returns the key before `key`, or `None` if `key` is first.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn prev_key(&self, storage: &S, key: K) -> Option<K> {
        let prev = Self::node(storage, key).prev;
        (prev != self.head).then_some(prev)
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns a reference to the element at `key`.
    #[inline]
    pub fn get<'a>(&'a self, storage: &'a S, key: K) -> Option<&'a T> {
        storage.get(key).and_then(|node| node.data.as_ref())
    }

    /// Returns a mutable reference to the element at `key`.
    #[inline]
    pub fn get_mut<'a>(&'a mut self, storage: &'a mut S, key: K) -> Option<&'a mut T> {
        storage.get_mut(key).and_then(|node| node.data.as_mut())
    }

    /// Returns a reference to the first element.
    #[inline]
    pub fn front<'a>(&'a self, storage: &'a S) -> Option<&'a T> {
        self.front_key(storage).and_then(|key| self.get(storage, key))
    }

    /// Returns a reference to the last element.
    #[inline]
    pub fn back<'a>(&'a self, storage: &'a S) -> Option<&'a T> {
        self.back_key(storage).and_then(|key| self.get(storage, key))
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    /// Allocates a detached node holding `value`.
    ///
    /// The node belongs to no list until linked.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    pub fn try_alloc(&self, storage: &mut S, value: T) -> Result<K, TryPushError<T>> {
        let key = match storage.try_insert(RingNode::new(None)) {
            Ok(key) => key,
            Err(err) => return Err(err.map(|_| value)),
        };
        let node = Self::node_mut(storage, key);
        node.data = Some(value);
        node.prev = key;
        node.next = key;
        Ok(key)
    }

    /// Allocates a node and links it first.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    #[inline]
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<K, TryPushError<T>> {
        let key = self.try_alloc(storage, value)?;
        self.link_front(storage, key);
        Ok(key)
    }

    /// Allocates a node and links it last.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    #[inline]
    pub fn try_push_back(&mut self, storage: &mut S, value: T) -> Result<K, TryPushError<T>> {
        let key = self.try_alloc(storage, value)?;
        self.link_back(storage, key);
        Ok(key)
    }

    /// Allocates a node and links it right after `at`.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not valid in storage.
    pub fn try_insert_after(
        &mut self,
        storage: &mut S,
        at: K,
        value: T,
    ) -> Result<K, TryPushError<T>> {
        let key = self.try_alloc(storage, value)?;
        self.link_after(storage, at, key);
        Ok(key)
    }

    /// Allocates a node and links it right before `at`.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not valid in storage.
    pub fn try_insert_before(
        &mut self,
        storage: &mut S,
        at: K,
        value: T,
    ) -> Result<K, TryPushError<T>> {
        let key = self.try_alloc(storage, value)?;
        self.link_before(storage, at, key);
        Ok(key)
    }

    // ========================================================================
    // Link operations (relink only, no alloc/dealloc)
    // ========================================================================

    /// Links a detached node right after `at`.
    ///
    /// `at` is an element of this list or its sentinel ([`head_key`](Self::head_key)).
    ///
    /// # Panics
    ///
    /// Panics if `at` or `key` is not valid in storage.
    #[inline]
    pub fn link_after(&mut self, storage: &mut S, at: K, key: K) {
        debug_assert!(key != self.head, "sentinel cannot be linked");
        debug_assert!(self.is_detached(storage, key), "node is already linked");
        let next = Self::node(storage, at).next;
        Self::splice_in(storage, key, at, next);
        self.len += 1;
    }

    /// Links a detached node right before `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` or `key` is not valid in storage.
    #[inline]
    pub fn link_before(&mut self, storage: &mut S, at: K, key: K) {
        debug_assert!(key != self.head, "sentinel cannot be linked");
        debug_assert!(self.is_detached(storage, key), "node is already linked");
        let prev = Self::node(storage, at).prev;
        Self::splice_in(storage, key, prev, at);
        self.len += 1;
    }

    /// Links a detached node first.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn link_front(&mut self, storage: &mut S, key: K) {
        self.link_after(storage, self.head, key);
    }

    /// Links a detached node last.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn link_back(&mut self, storage: &mut S, key: K) {
        self.link_before(storage, self.head, key);
    }

    /// Unlinks a node without freeing it. The node is left detached.
    ///
    /// Returns `false` if the node was already detached, or is the sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn unlink(&mut self, storage: &mut S, key: K) -> bool {
        if key == self.head {
            return false;
        }
        let node = Self::node(storage, key);
        let (prev, next) = (node.prev, node.next);
        if next == key {
            return false;
        }

        Self::bridge(storage, prev, next);
        Self::detach(storage, key);
        self.len -= 1;
        true
    }

    // ========================================================================
    // Remove operations (unlink + free)
    // ========================================================================

    /// Unlinks and frees the node at `key`, returning its value.
    ///
    /// Also frees detached nodes. Returns `None` if `key` is not in storage
    /// or is the sentinel.
    pub fn remove(&mut self, storage: &mut S, key: K) -> Option<T> {
        if key == self.head || !storage.contains(key) {
            return None;
        }
        self.unlink(storage, key);
        storage.remove(key).and_then(|node| node.data)
    }

    /// Removes and returns the first element.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let key = self.front_key(storage)?;
        self.remove(storage, key)
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop_back(&mut self, storage: &mut S) -> Option<T> {
        let key = self.back_key(storage)?;
        self.remove(storage, key)
    }

    /// Frees every element. The sentinel stays.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.first(storage);
        while key != self.head {
            let next = Self::node(storage, key).next;
            storage.remove(key);
            key = next;
        }
        Self::detach(storage, self.head);
        self.len = 0;
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Puts detached node `new` in the place of linked node `old`.
    ///
    /// `old` is left detached. Returns `false` if `old` is not linked or is
    /// the sentinel.
    ///
    /// # Panics
    ///
    /// Panics if `old` or `new` is not valid in storage.
    pub fn replace(&mut self, storage: &mut S, old: K, new: K) -> bool {
        if old == self.head || old == new {
            return false;
        }
        let node = Self::node(storage, old);
        let (prev, next) = (node.prev, node.next);
        if next == old {
            return false;
        }
        debug_assert!(self.is_detached(storage, new), "replacement is already linked");

        Self::splice_in(storage, new, prev, next);
        Self::detach(storage, old);
        true
    }

    /// Moves a linked element to the front.
    ///
    /// Returns `false` if `key` is not linked or is the sentinel.
    pub fn move_to_front(&mut self, storage: &mut S, key: K) -> bool {
        if !self.unlink(storage, key) {
            return false;
        }
        self.link_front(storage, key);
        true
    }

    /// Moves a linked element to the back.
    ///
    /// Returns `false` if `key` is not linked or is the sentinel.
    pub fn move_to_back(&mut self, storage: &mut S, key: K) -> bool {
        if !self.unlink(storage, key) {
            return false;
        }
        self.link_back(storage, key);
        true
    }

    /// Moves the first element to the back.
    pub fn rotate_left(&mut self, storage: &mut S) {
        if self.len > 1 {
            let first = self.first(storage);
            self.move_to_back(storage, first);
        }
    }

    // ========================================================================
    // Splice / cut
    // ========================================================================

    /// Joins every element of `other` onto the front of this list.
    ///
    /// `other` is left empty. O(1).
    pub fn splice_front(&mut self, storage: &mut S, other: &mut Self) {
        let next = self.first(storage);
        self.splice_between(storage, other, self.head, next);
    }

    /// Joins every element of `other` onto the back of this list.
    ///
    /// `other` is left empty. O(1).
    pub fn splice_back(&mut self, storage: &mut S, other: &mut Self) {
        let prev = self.last(storage);
        self.splice_between(storage, other, prev, self.head);
    }

    fn splice_between(&mut self, storage: &mut S, other: &mut Self, prev: K, next: K) {
        if other.is_empty() {
            return;
        }
        let first = other.first(storage);
        let last = other.last(storage);

        Self::node_mut(storage, first).prev = prev;
        Self::node_mut(storage, prev).next = first;
        Self::node_mut(storage, last).next = next;
        Self::node_mut(storage, next).prev = last;

        self.len += other.len;
        Self::detach(storage, other.head);
        other.len = 0;
    }

    /// Moves the prefix ending at `entry` (inclusive) into `dest`.
    ///
    /// Passing the sentinel as `entry` moves nothing. An empty list is left
    /// alone. Finding `entry` walks the prefix, so this is O(k) in the number
    /// of moved elements.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `dest` is not empty
    /// - [`Error::NotFound`] if `entry` is not an element of this list
    pub fn cut_position(&mut self, storage: &mut S, entry: K, dest: &mut Self) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        if !dest.is_empty() {
            return Err(Error::InvalidArgument("destination list must be empty"));
        }
        if entry == self.head {
            return Ok(());
        }

        let mut moved = 0;
        let mut key = self.first(storage);
        loop {
            if key == self.head {
                tracing::debug!(?entry, "cut_position: entry not in list");
                return Err(Error::NotFound);
            }
            moved += 1;
            if key == entry {
                break;
            }
            key = Self::node(storage, key).next;
        }

        let first = self.first(storage);
        let rest = Self::node(storage, entry).next;

        Self::node_mut(storage, dest.head).next = first;
        Self::node_mut(storage, first).prev = dest.head;
        Self::node_mut(storage, entry).next = dest.head;
        Self::node_mut(storage, dest.head).prev = entry;
        Self::bridge(storage, self.head, rest);

        dest.len = moved;
        self.len -= moved;
        Ok(())
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over elements, front to back.
    ///
    /// Double-ended: `.rev()` walks back to front.
    pub fn iter<'a>(&'a self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter {
            keys: self.keys(storage),
        }
    }

    /// Returns an iterator over element keys, front to back.
    pub fn keys<'a>(&'a self, storage: &'a S) -> Keys<'a, T, S, K> {
        Keys {
            storage,
            front: self.first(storage),
            back: self.last(storage),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Calls `f` on every element key, front to back.
    ///
    /// The next key is read before `f` runs, so `f` may unlink or remove the
    /// node it is given. Removing any other node is a caller error.
    pub fn for_each_safe<F>(&mut self, storage: &mut S, mut f: F)
    where
        F: FnMut(&mut Self, &mut S, K),
    {
        let mut key = self.first(storage);
        while key != self.head {
            let next = Self::node(storage, key).next;
            f(self, storage, key);
            key = next;
        }
    }

    /// Calls `f` on every element key, back to front. Same rules as
    /// [`for_each_safe`](Self::for_each_safe).
    pub fn for_each_safe_rev<F>(&mut self, storage: &mut S, mut f: F)
    where
        F: FnMut(&mut Self, &mut S, K),
    {
        let mut key = self.last(storage);
        while key != self.head {
            let prev = Self::node(storage, key).prev;
            f(self, storage, key);
            key = prev;
        }
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Checks the ring: every `next.prev` and `prev.next` points back, and
    /// both directions return to the sentinel after `len + 1` steps.
    pub fn validate(&self, storage: &S) -> bool {
        let mut steps = 0;
        let mut key = self.head;
        loop {
            let Some(node) = storage.get(key) else {
                return false;
            };
            let next_ok = storage.get(node.next).is_some_and(|n| n.prev == key);
            let prev_ok = storage.get(node.prev).is_some_and(|n| n.next == key);
            if !next_ok || !prev_ok {
                return false;
            }
            steps += 1;
            key = node.next;
            if key == self.head || steps > self.len {
                break;
            }
        }
        if key != self.head || steps != self.len + 1 {
            return false;
        }

        let mut back_steps = 0;
        let mut key = self.head;
        loop {
            let Some(node) = storage.get(key) else {
                return false;
            };
            key = node.prev;
            back_steps += 1;
            if key == self.head || back_steps > self.len {
                break;
            }
        }
        key == self.head && back_steps == self.len + 1
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over element keys of a [`RingList`].
pub struct Keys<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<T, S, K: Key> Iterator for Keys<'_, T, S, K>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    type Item = K;

    fn next(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.front;
        self.front = self.storage.get(key)?.next;
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S, K: Key> DoubleEndedIterator for Keys<'_, T, S, K>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    fn next_back(&mut self) -> Option<K> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.back;
        self.back = self.storage.get(key)?.prev;
        self.remaining -= 1;
        Some(key)
    }
}

impl<T, S, K: Key> ExactSizeIterator for Keys<'_, T, S, K> where
    S: Storage<RingNode<T, K>, Key = K>
{
}

/// Iterator over elements of a [`RingList`].
pub struct Iter<'a, T, S, K: Key> {
    keys: Keys<'a, T, S, K>,
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let storage = self.keys.storage;
        let key = self.keys.next()?;
        storage.get(key)?.data.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<RingNode<T, K>, Key = K>,
{
    fn next_back(&mut self) -> Option<&'a T> {
        let storage = self.keys.storage;
        let key = self.keys.next_back()?;
        storage.get(key)?.data.as_ref()
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for Iter<'a, T, S, K> where
    S: Storage<RingNode<T, K>, Key = K>
{
}
