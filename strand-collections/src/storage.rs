//! Slot storage with stable keys.
//!
//! Storage owns node data and hands out [`Key`]s that stay valid until the
//! slot is removed. Collections coordinate keys; they never own nodes. This
//! lets several lists draw from one pool and lets a node move between
//! collections without being reallocated.
//!
//! Removed slots are reused LIFO: the most recently freed key is the next one
//! handed out.
//!
//! # Implementations
//!
//! - [`BoxedStorage`]: fixed capacity, rejects inserts past it
//! - [`GrowableStorage`]: unbounded, grows with fallible reservation
//! - `slab::Slab<T>`: growable (feature `slab`)

use crate::{Error, Key, TryPushError};

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// - **Stable keys**: a key stays valid until explicitly removed
/// - **O(1)** insert, remove, get
/// - **Slot reuse**: removed slots are reused by later inserts
/// - **Bounds safety**: `get`/`remove` on a vacant or out-of-range key return
///   `None`
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Hands the value back in [`TryPushError::Overflow`] when a fixed-capacity
    /// storage is full, or [`TryPushError::AllocationFailure`] when growable
    /// storage cannot grow.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, TryPushError<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` names an occupied slot.
    #[inline]
    fn contains(&self, key: Self::Key) -> bool {
        self.get(key).is_some()
    }
}

// =============================================================================
// SlotTable - shared slot array + free stack
// =============================================================================

enum Slot<T> {
    Occupied(T),
    Vacant,
}

/// Slot array plus a LIFO free stack.
///
/// The free stack's capacity is kept at least as large as the slot array, so
/// pushing a freed key never allocates.
struct SlotTable<T, K> {
    entries: Vec<Slot<T>>,
    free: Vec<K>,
    len: usize,
}

impl<T, K: Key> SlotTable<T, K> {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.entries.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.entries.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn occupy(&mut self, key: K, value: T) {
        self.entries[key.as_usize()] = Slot::Occupied(value);
        self.len += 1;
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.entries.get_mut(key.as_usize())?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free.push(key);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant => None,
        }
    }
}

// =============================================================================
// BoxedStorage - fixed capacity
// =============================================================================

/// Fixed-capacity storage with runtime-determined size.
///
/// All slots and the free stack are reserved at construction; inserts never
/// allocate.
///
/// # Example
///
/// ```
/// use strand_collections::{BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(2).unwrap();
/// let a = storage.try_insert(1).unwrap();
/// let _b = storage.try_insert(2).unwrap();
///
/// let err = storage.try_insert(3).unwrap_err();
/// assert!(err.is_overflow());
/// assert_eq!(err.into_inner(), 3);
///
/// assert_eq!(storage.remove(a), Some(1));
/// assert_eq!(storage.try_insert(4).unwrap(), a); // slot reused
/// ```
pub struct BoxedStorage<T, K: Key = u32> {
    table: SlotTable<T, K>,
    capacity: usize,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` is zero or exceeds the key
    ///   type's range
    /// - [`Error::AllocationFailure`] if the slots cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be > 0"));
        }
        if capacity > K::NONE.as_usize() {
            return Err(Error::InvalidArgument("capacity exceeds key range"));
        }

        let mut table = SlotTable::new();
        table
            .entries
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure)?;
        table
            .free
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure)?;

        table.entries.resize_with(capacity, || Slot::Vacant);
        // Reverse so the first insert gets key 0.
        table.free.extend((0..capacity).rev().map(K::from_usize));

        tracing::debug!(capacity, "boxed storage created");
        Ok(Self { table, capacity })
    }

    /// Returns the capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.table.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.table.len == 0
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.table.len == self.capacity
    }

    /// Drops every stored value and makes all slots available again.
    ///
    /// Collections still holding keys into this storage are left dangling;
    /// clear or release them first.
    pub fn clear(&mut self) {
        for slot in &mut self.table.entries {
            *slot = Slot::Vacant;
        }
        self.table.free.clear();
        self.table
            .free
            .extend((0..self.capacity).rev().map(K::from_usize));
        self.table.len = 0;
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, TryPushError<T>> {
        let Some(key) = self.table.free.pop() else {
            tracing::trace!(capacity = self.capacity, "boxed storage insert rejected: full");
            return Err(TryPushError::Overflow(value));
        };
        self.table.occupy(key, value);
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.table.remove(key)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.table.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.table.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.table.len
    }
}

impl<T, K: Key> std::fmt::Debug for BoxedStorage<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedStorage")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

// =============================================================================
// GrowableStorage - unbounded
// =============================================================================

/// Unbounded storage that grows on demand.
///
/// Growth uses fallible reservation: when memory cannot be obtained, or the
/// key type has no unused values left, the insert fails with
/// [`TryPushError::AllocationFailure`] and hands the value back.
///
/// # Example
///
/// ```
/// use strand_collections::{GrowableStorage, Storage};
///
/// let mut storage: GrowableStorage<&str> = GrowableStorage::new();
/// let key = storage.try_insert("edge").unwrap();
/// assert_eq!(storage.get(key), Some(&"edge"));
/// ```
pub struct GrowableStorage<T, K: Key = u32> {
    table: SlotTable<T, K>,
}

impl<T, K: Key> GrowableStorage<T, K> {
    /// Creates empty storage. Does not allocate.
    pub const fn new() -> Self {
        Self {
            table: SlotTable::new(),
        }
    }

    /// Creates empty storage with room for `capacity` values before growing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the reservation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut storage = Self::new();
        storage
            .table
            .entries
            .try_reserve(capacity)
            .map_err(|_| Error::AllocationFailure)?;
        storage
            .table
            .free
            .try_reserve(capacity)
            .map_err(|_| Error::AllocationFailure)?;
        Ok(storage)
    }

    /// Returns the number of slots held without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.entries.capacity()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.table.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.table.len == 0
    }

    /// Drops every stored value. Allocated capacity is kept.
    ///
    /// Collections still holding keys into this storage are left dangling;
    /// clear or release them first.
    pub fn clear(&mut self) {
        self.table.entries.clear();
        self.table.free.clear();
        self.table.len = 0;
    }

    fn grow(&mut self) -> Result<K, ()> {
        let index = self.table.entries.len();
        if index >= K::NONE.as_usize() {
            tracing::debug!(index, "growable storage key space exhausted");
            return Err(());
        }
        self.table.entries.try_reserve(1).map_err(|_| ())?;
        let free_needed = self.table.entries.len() + 1 - self.table.free.len();
        self.table.free.try_reserve(free_needed).map_err(|_| ())?;
        self.table.entries.push(Slot::Vacant);
        Ok(K::from_usize(index))
    }
}

impl<T, K: Key> Default for GrowableStorage<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> Storage<T> for GrowableStorage<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, TryPushError<T>> {
        let key = match self.table.free.pop() {
            Some(key) => key,
            None => match self.grow() {
                Ok(key) => key,
                Err(()) => return Err(TryPushError::AllocationFailure(value)),
            },
        };
        self.table.occupy(key, value);
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        self.table.remove(key)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.table.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.table.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.table.len
    }
}

impl<T, K: Key> std::fmt::Debug for GrowableStorage<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowableStorage")
            .field("len", &self.len())
            .field("slots", &self.table.entries.len())
            .finish()
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

/// Growable storage backed by `slab::Slab`.
///
/// `Slab` has no fallible reservation. Running out of key space is reported
/// as `AllocationFailure`, but out-of-memory while growing aborts the way
/// `Vec::push` does. Use [`GrowableStorage`] where every allocation must
/// surface as an error.
#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    /// Inserts through `Slab::insert`; may reallocate, aborting on OOM.
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, TryPushError<T>> {
        if self.vacant_key() >= usize::NONE {
            return Err(TryPushError::AllocationFailure(value));
        }
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.get_mut(key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16).unwrap();
        assert!(storage.is_empty());
        assert!(!storage.is_full());
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), 16);
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = BoxedStorage::<u64>::with_capacity(0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn capacity_beyond_key_range_rejected() {
        let result = BoxedStorage::<u64, u8>::with_capacity(256);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let storage = BoxedStorage::<u64, u8>::with_capacity(255).unwrap();
        assert_eq!(storage.capacity(), 255);
    }

    #[test]
    fn insert_get_remove() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16).unwrap();
        let key = storage.try_insert(42).unwrap();
        assert_eq!(key, 0);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(key), Some(&42));
        assert!(storage.contains(key));

        assert_eq!(storage.remove(key), Some(42));
        assert_eq!(storage.get(key), None);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn get_mut() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16).unwrap();
        let key = storage.try_insert(10).unwrap();
        *storage.get_mut(key).unwrap() = 20;
        assert_eq!(storage.get(key), Some(&20));
    }

    #[test]
    fn fill_to_capacity() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4).unwrap();
        let keys: Vec<_> = (0..4).map(|i| storage.try_insert(i).unwrap()).collect();
        assert!(storage.is_full());

        let err = storage.try_insert(4).unwrap_err();
        assert!(err.is_overflow());
        assert_eq!(err.into_inner(), 4);

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(storage.get(*key), Some(&(i as u64)));
        }
    }

    #[test]
    fn slot_reuse_is_lifo() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4).unwrap();
        let k0 = storage.try_insert(0).unwrap();
        let k1 = storage.try_insert(1).unwrap();
        storage.remove(k0);
        storage.remove(k1);

        assert_eq!(storage.try_insert(2).unwrap(), k1);
        assert_eq!(storage.try_insert(3).unwrap(), k0);
    }

    #[test]
    fn remove_vacant_or_out_of_range() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4).unwrap();
        let key = storage.try_insert(42).unwrap();
        storage.remove(key);

        assert_eq!(storage.remove(key), None);
        assert_eq!(storage.remove(1000), None);
        assert_eq!(storage.get(u32::NONE), None);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn clear_drops_and_resets() {
        use std::rc::Rc;

        let marker = Rc::new(());
        let mut storage: BoxedStorage<Rc<()>> = BoxedStorage::with_capacity(3).unwrap();
        for _ in 0..3 {
            storage.try_insert(Rc::clone(&marker)).unwrap();
        }
        assert_eq!(Rc::strong_count(&marker), 4);

        storage.clear();
        assert_eq!(Rc::strong_count(&marker), 1);
        assert!(storage.is_empty());
        assert_eq!(storage.try_insert(Rc::clone(&marker)).unwrap(), 0);
    }

    #[test]
    fn drop_cleans_up() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

        struct DropCounter;

        impl Drop for DropCounter {
            fn drop(&mut self) {
                DROP_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        {
            let mut storage: GrowableStorage<DropCounter> = GrowableStorage::new();
            storage.try_insert(DropCounter).unwrap();
            storage.try_insert(DropCounter).unwrap();
            storage.try_insert(DropCounter).unwrap();
        }

        assert_eq!(DROP_COUNT.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn growable_grows_and_reuses() {
        let mut storage: GrowableStorage<u32> = GrowableStorage::new();
        let keys: Vec<_> = (0..100).map(|i| storage.try_insert(i).unwrap()).collect();
        assert_eq!(storage.len(), 100);
        assert_eq!(keys, (0..100).collect::<Vec<u32>>());

        storage.remove(keys[10]);
        storage.remove(keys[20]);
        assert_eq!(storage.try_insert(7).unwrap(), keys[20]);
        assert_eq!(storage.try_insert(8).unwrap(), keys[10]);
        assert_eq!(storage.try_insert(9).unwrap(), 100);
    }

    #[test]
    fn growable_key_space_exhaustion() {
        let mut storage: GrowableStorage<u8, u8> = GrowableStorage::new();
        for i in 0..255u16 {
            storage.try_insert(i as u8).unwrap();
        }

        let err = storage.try_insert(0).unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(storage.len(), 255);

        storage.remove(3);
        assert_eq!(storage.try_insert(1).unwrap(), 3);
    }

    #[test]
    fn growable_clear() {
        let mut storage: GrowableStorage<u64> = GrowableStorage::with_capacity(8).unwrap();
        assert!(storage.capacity() >= 8);
        storage.try_insert(1).unwrap();
        storage.try_insert(2).unwrap();
        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.try_insert(3).unwrap(), 0);
    }

    #[test]
    fn u16_key() {
        let mut storage: BoxedStorage<u64, u16> = BoxedStorage::with_capacity(100).unwrap();
        let key = storage.try_insert(42).unwrap();
        assert_eq!(storage.get(key), Some(&42));
    }

    #[cfg(feature = "slab")]
    mod slab_tests {
        use super::*;

        #[test]
        fn insert_get_remove() {
            let mut storage = slab::Slab::new();
            let key = Storage::try_insert(&mut storage, 42).unwrap();
            assert_eq!(Storage::get(&storage, key), Some(&42));
            assert_eq!(Storage::remove(&mut storage, key), Some(42));
            assert_eq!(Storage::remove(&mut storage, key), None);
        }

        #[test]
        fn slot_reuse() {
            let mut storage = slab::Slab::new();
            let k1 = Storage::try_insert(&mut storage, 1).unwrap();
            Storage::remove(&mut storage, k1);
            let k2 = Storage::try_insert(&mut storage, 2).unwrap();
            assert_eq!(k1, k2);
        }

        #[test]
        fn grows_past_initial_capacity() {
            let mut storage = slab::Slab::with_capacity(2);
            let keys: Vec<_> = (0..10)
                .map(|i| Storage::try_insert(&mut storage, i).unwrap())
                .collect();
            assert_eq!(Storage::len(&storage), 10);
            assert!(storage.capacity() >= 10);
            for (i, &key) in keys.iter().enumerate() {
                assert_eq!(Storage::get(&storage, key), Some(&i));
            }
        }
    }
}
