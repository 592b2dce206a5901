//! Singly linked bucket list for hash tables.
//!
//! A bucket is a single `first` link, half the size of a [`RingList`] head,
//! which matters when a table has thousands of mostly-empty buckets. Nodes
//! carry a forward link plus a back-link naming whatever points at them: the
//! bucket itself or the previous node. That back-link is what makes O(1)
//! unlink possible without a doubly linked ring. There is no tail access.
//!
//! A node in no bucket is *unhashed*.
//!
//! # Storage Invariant
//!
//! A bucket must always be used with the storage its nodes live in, and
//! many buckets usually share one storage. A node's back-link records only
//! that a bucket points at it, not which one, so unlinking or removing a node
//! through a bucket it does not belong to is a caller error: it overwrites
//! that bucket's `first` link. Link operations panic on keys that are not in
//! storage at all.
//!
//! # Example
//!
//! ```
//! use strand_collections::{BucketList, GrowableBucketStorage};
//!
//! let mut storage: GrowableBucketStorage<(u32, &str)> = GrowableBucketStorage::new();
//! let mut buckets: Vec<BucketList<(u32, &str), _>> = (0..8).map(|_| BucketList::new()).collect();
//!
//! for (id, name) in [(3, "three"), (11, "eleven"), (5, "five")] {
//!     buckets[id as usize % 8].try_push_front(&mut storage, (id, name)).unwrap();
//! }
//!
//! let bucket: Vec<_> = buckets[3].iter(&storage).map(|(id, _)| *id).collect();
//! assert_eq!(bucket, vec![11, 3]);
//! ```
//!
//! [`RingList`]: crate::RingList

use std::marker::PhantomData;

use crate::{GrowableStorage, Key, Storage, TryPushError};

/// Growable storage for bucket list nodes.
pub type GrowableBucketStorage<T, K = u32> = GrowableStorage<BucketNode<T, K>, K>;

/// Who points at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackLink<K> {
    Unhashed,
    Bucket,
    Node(K),
}

/// A bucket list node.
#[derive(Debug)]
pub struct BucketNode<T, K: Key = u32> {
    data: T,
    next: K,
    pprev: BackLink<K>,
}

/// A singly linked list whose nodes can unlink themselves in O(1).
#[derive(Debug)]
pub struct BucketList<T, S, K: Key = u32>
where
    S: Storage<BucketNode<T, K>, Key = K>,
{
    first: K,
    len: usize,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> Default for BucketList<T, S, K>
where
    S: Storage<BucketNode<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, K: Key> BucketList<T, S, K>
where
    S: Storage<BucketNode<T, K>, Key = K>,
{
    /// Creates an empty bucket.
    #[inline]
    pub const fn new() -> Self {
        Self {
            first: K::NONE,
            len: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn node(storage: &S, key: K) -> &BucketNode<T, K> {
        storage.get(key).expect("invalid key")
    }

    #[inline]
    fn node_mut(storage: &mut S, key: K) -> &mut BucketNode<T, K> {
        storage.get_mut(key).expect("invalid key")
    }

    /// Points whatever `back` names at `key`.
    #[inline]
    fn set_forward(&mut self, storage: &mut S, back: BackLink<K>, key: K) {
        match back {
            BackLink::Bucket => self.first = key,
            BackLink::Node(prev) => Self::node_mut(storage, prev).next = key,
            BackLink::Unhashed => {}
        }
    }

    /// Returns the number of nodes in the bucket.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bucket is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Returns the first node's key.
    #[inline]
    pub fn first_key(&self) -> Option<K> {
        self.first.to_option()
    }

    /// Returns the key after `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn next_key(&self, storage: &S, key: K) -> Option<K> {
        Self::node(storage, key).next.to_option()
    }

    /// Returns `true` if `key` is in no bucket.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    #[inline]
    pub fn is_unhashed(&self, storage: &S, key: K) -> bool {
        Self::node(storage, key).pprev == BackLink::Unhashed
    }

    /// Returns a reference to the value at `key`.
    #[inline]
    pub fn get<'a>(&'a self, storage: &'a S, key: K) -> Option<&'a T> {
        storage.get(key).map(|node| &node.data)
    }

    /// Returns a mutable reference to the value at `key`.
    #[inline]
    pub fn get_mut<'a>(&'a mut self, storage: &'a mut S, key: K) -> Option<&'a mut T> {
        storage.get_mut(key).map(|node| &mut node.data)
    }

    /// Returns a reference to the first value.
    #[inline]
    pub fn front<'a>(&'a self, storage: &'a S) -> Option<&'a T> {
        self.first_key().and_then(|key| self.get(storage, key))
    }

    /// Allocates an unhashed node holding `value`.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    pub fn try_alloc(&self, storage: &mut S, value: T) -> Result<K, TryPushError<T>> {
        storage
            .try_insert(BucketNode {
                data: value,
                next: K::NONE,
                pprev: BackLink::Unhashed,
            })
            .map_err(|err| err.map(|node| node.data))
    }

    /// Allocates a node and links it first.
    ///
    /// # Errors
    ///
    /// Hands `value` back if storage has no room.
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<K, TryPushError<T>> {
        let key = self.try_alloc(storage, value)?;
        self.link_front(storage, key);
        Ok(key)
    }

    /// Links an unhashed node first.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    pub fn link_front(&mut self, storage: &mut S, key: K) {
        debug_assert!(self.is_unhashed(storage, key), "node is already hashed");
        let first = self.first;
        let node = Self::node_mut(storage, key);
        node.next = first;
        node.pprev = BackLink::Bucket;
        if first.is_some() {
            Self::node_mut(storage, first).pprev = BackLink::Node(key);
        }
        self.first = key;
        self.len += 1;
    }

    /// Links an unhashed node right before `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` or `key` is not valid in storage.
    pub fn link_before(&mut self, storage: &mut S, at: K, key: K) {
        debug_assert!(self.is_unhashed(storage, key), "node is already hashed");
        let back = Self::node(storage, at).pprev;
        debug_assert!(back != BackLink::Unhashed, "anchor is not hashed");

        let node = Self::node_mut(storage, key);
        node.next = at;
        node.pprev = back;
        Self::node_mut(storage, at).pprev = BackLink::Node(key);
        self.set_forward(storage, back, key);
        self.len += 1;
    }

    /// Links an unhashed node right after `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` or `key` is not valid in storage.
    pub fn link_after(&mut self, storage: &mut S, at: K, key: K) {
        debug_assert!(self.is_unhashed(storage, key), "node is already hashed");
        let next = Self::node(storage, at).next;

        let node = Self::node_mut(storage, key);
        node.next = next;
        node.pprev = BackLink::Node(at);
        Self::node_mut(storage, at).next = key;
        if next.is_some() {
            Self::node_mut(storage, next).pprev = BackLink::Node(key);
        }
        self.len += 1;
    }

    /// Unlinks a node without freeing it. The node is left unhashed.
    ///
    /// Returns `false` if the node was already unhashed.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not valid in storage.
    pub fn unlink(&mut self, storage: &mut S, key: K) -> bool {
        let node = Self::node(storage, key);
        let (next, back) = (node.next, node.pprev);
        if back == BackLink::Unhashed {
            return false;
        }

        self.set_forward(storage, back, next);
        if next.is_some() {
            Self::node_mut(storage, next).pprev = back;
        }

        let node = Self::node_mut(storage, key);
        node.next = K::NONE;
        node.pprev = BackLink::Unhashed;
        self.len -= 1;
        true
    }

    /// Unlinks and frees the node at `key`, returning its value.
    pub fn remove(&mut self, storage: &mut S, key: K) -> Option<T> {
        if !storage.contains(key) {
            return None;
        }
        self.unlink(storage, key);
        storage.remove(key).map(|node| node.data)
    }

    /// Removes and returns the first value.
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let key = self.first_key()?;
        self.remove(storage, key)
    }

    /// Moves every node into a new bucket, leaving this one empty. O(1).
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::new())
    }

    /// Frees every node.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.first;
        while key.is_some() {
            let next = Self::node(storage, key).next;
            storage.remove(key);
            key = next;
        }
        self.first = K::NONE;
        self.len = 0;
    }

    /// Returns an iterator over values, first to last.
    pub fn iter<'a>(&'a self, storage: &'a S) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.keys(storage)
            .filter_map(move |key| storage.get(key).map(|node| &node.data))
    }

    /// Returns an iterator over keys, first to last.
    pub fn keys<'a>(&'a self, storage: &'a S) -> impl Iterator<Item = K> {
        let mut key = self.first;
        std::iter::from_fn(move || {
            if key.is_none() {
                return None;
            }
            let current = key;
            key = storage.get(current)?.next;
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestStorage = GrowableBucketStorage<u64>;
    type TestBucket = BucketList<u64, TestStorage>;

    fn collect(bucket: &TestBucket, storage: &TestStorage) -> Vec<u64> {
        bucket.iter(storage).copied().collect()
    }

    #[test]
    fn push_front_prepends() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        assert!(bucket.is_empty());

        for i in 0..3 {
            bucket.try_push_front(&mut storage, i).unwrap();
        }
        assert_eq!(collect(&bucket, &storage), vec![2, 1, 0]);
        assert_eq!(bucket.len(), 3);
        assert_eq!(bucket.front(&storage), Some(&2));
    }

    #[test]
    fn unlink_first_middle_last() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        let keys: Vec<_> = (0..5)
            .map(|i| bucket.try_push_front(&mut storage, i).unwrap())
            .collect();
        // Bucket order: 4 3 2 1 0

        assert!(bucket.unlink(&mut storage, keys[4]));
        assert!(bucket.unlink(&mut storage, keys[2]));
        assert!(bucket.unlink(&mut storage, keys[0]));
        assert_eq!(collect(&bucket, &storage), vec![3, 1]);
        assert_eq!(bucket.len(), 2);

        assert!(bucket.is_unhashed(&storage, keys[2]));
        assert!(!bucket.unlink(&mut storage, keys[2]));
    }

    #[test]
    fn link_before_and_after() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        let b = bucket.try_push_front(&mut storage, 2).unwrap();

        let a = bucket.try_alloc(&mut storage, 1).unwrap();
        bucket.link_before(&mut storage, b, a);
        let c = bucket.try_alloc(&mut storage, 3).unwrap();
        bucket.link_after(&mut storage, b, c);
        let d = bucket.try_alloc(&mut storage, 4).unwrap();
        bucket.link_after(&mut storage, c, d);

        assert_eq!(collect(&bucket, &storage), vec![1, 2, 3, 4]);
        assert_eq!(bucket.first_key(), Some(a));

        // Middle unlink after relinking keeps back-links right.
        bucket.unlink(&mut storage, c);
        assert_eq!(collect(&bucket, &storage), vec![1, 2, 4]);
        bucket.unlink(&mut storage, a);
        assert_eq!(collect(&bucket, &storage), vec![2, 4]);
        assert_eq!(bucket.first_key(), Some(b));
    }

    #[test]
    fn move_between_buckets() {
        let mut storage = TestStorage::new();
        let mut from = TestBucket::new();
        let mut to = TestBucket::new();

        let key = from.try_push_front(&mut storage, 7).unwrap();
        from.unlink(&mut storage, key);
        to.link_front(&mut storage, key);

        assert!(from.is_empty());
        assert_eq!(to.get(&storage, key), Some(&7));
    }

    #[test]
    fn take_moves_whole_chain() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        for i in 0..3 {
            bucket.try_push_front(&mut storage, i).unwrap();
        }

        let mut moved = bucket.take();
        assert!(bucket.is_empty());
        assert_eq!(collect(&moved, &storage), vec![2, 1, 0]);

        // First node still unlinks through the bucket link.
        assert_eq!(moved.pop_front(&mut storage), Some(2));
        assert_eq!(collect(&moved, &storage), vec![1, 0]);
    }

    #[test]
    fn remove_and_clear() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        let a = bucket.try_push_front(&mut storage, 1).unwrap();
        bucket.try_push_front(&mut storage, 2).unwrap();

        assert_eq!(bucket.remove(&mut storage, a), Some(1));
        assert_eq!(bucket.remove(&mut storage, a), None);

        bucket.clear(&mut storage);
        assert!(bucket.is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn next_key_walks_chain() {
        let mut storage = TestStorage::new();
        let mut bucket = TestBucket::new();
        let a = bucket.try_push_front(&mut storage, 1).unwrap();
        let b = bucket.try_push_front(&mut storage, 2).unwrap();

        assert_eq!(bucket.next_key(&storage, b), Some(a));
        assert_eq!(bucket.next_key(&storage, a), None);
        assert_eq!(bucket.keys(&storage).collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn buckets_share_storage() {
        let mut storage: GrowableBucketStorage<u32> = GrowableBucketStorage::new();
        let mut even: BucketList<u32, _> = BucketList::new();
        let mut odd: BucketList<u32, _> = BucketList::new();

        let mut keys = Vec::new();
        for v in 0..6 {
            let bucket = if v % 2 == 0 { &mut even } else { &mut odd };
            keys.push(bucket.try_push_front(&mut storage, v).unwrap());
        }

        // Head of `odd` unlinked through its own bucket.
        assert!(odd.unlink(&mut storage, keys[5]));
        assert_eq!(odd.iter(&storage).copied().collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(even.iter(&storage).copied().collect::<Vec<_>>(), vec![4, 2, 0]);

        // Detached, it can join the other bucket.
        even.link_front(&mut storage, keys[5]);
        assert_eq!(even.first_key(), Some(keys[5]));
        assert_eq!(even.len(), 4);
        assert_eq!(odd.len(), 2);
    }
}
