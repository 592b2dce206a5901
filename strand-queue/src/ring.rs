//! Fixed-capacity FIFO ring queue.
//!
//! The queue is a circular array with `head`, `tail` and `count`:
//!
//! ```text
//! capacity = 8, head = 6, count = 4
//!
//!   0   1   2   3   4   5   6   7
//! ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! │ c │ d │   │   │   │   │ a │ b │
//! └───┴───┴───┴───┴───┴───┴───┴───┘
//!           ▲               ▲
//!          tail            head
//! ```
//!
//! `tail == (head + count) % capacity` holds after every operation. Push on a
//! full queue and pop on an empty one are rejected without touching state.
//!
//! # Locking
//!
//! [`RingQueue`] is the lock-free form: every mutating method takes
//! `&mut self`, so the borrow checker serializes access. [`SyncRingQueue`]
//! wraps the same queue in a single mutex and exposes the operations on
//! `&self`, one lock acquisition per call. The two modes cannot be mixed on
//! one instance: reaching the inner queue of a `SyncRingQueue` without the
//! lock requires `&mut` or ownership.
//!
//! # Example
//!
//! ```
//! use strand_queue::RingQueue;
//!
//! let mut queue = RingQueue::with_capacity(2).unwrap();
//! queue.push(1).unwrap();
//! queue.push(2).unwrap();
//! assert!(queue.push(3).is_err());
//!
//! assert_eq!(queue.pop(), Ok(1));
//! assert_eq!(queue.pop(), Ok(2));
//! ```

use parking_lot::{Mutex, MutexGuard};

use crate::error::{Error, Overflow, allocate_slots};

/// A fixed-capacity FIFO queue backed by a circular array.
pub struct RingQueue<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    count: usize,
}

impl<T> RingQueue<T> {
    /// Creates an empty queue holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` is zero
    /// - [`Error::AllocationFailure`] if the backing array cannot be allocated
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let slots = allocate_slots(capacity)?;
        tracing::debug!(capacity, "ring queue created");
        Ok(Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if the queue is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Appends a value at the tail.
    ///
    /// # Errors
    ///
    /// Returns `Err(Overflow(value))` if the queue is full. The queue is left
    /// unchanged.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Overflow<T>> {
        if self.is_full() {
            tracing::trace!(capacity = self.capacity(), "ring queue push rejected: full");
            return Err(Overflow(value));
        }

        self.slots[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        self.debug_check();
        Ok(())
    }

    /// Removes and returns the value at the head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the queue is empty.
    #[inline]
    pub fn pop(&mut self) -> Result<T, Error> {
        if self.is_empty() {
            tracing::trace!("ring queue pop rejected: empty");
            return Err(Error::Underflow);
        }

        let value = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        self.debug_check();

        // Occupied slots are always `Some`; a `None` here means the indices
        // were corrupted.
        value.ok_or(Error::Underflow)
    }

    /// Returns a reference to the value at the head without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the queue is empty.
    #[inline]
    pub fn front(&self) -> Result<&T, Error> {
        if self.is_empty() {
            return Err(Error::Underflow);
        }
        self.slots[self.head].as_ref().ok_or(Error::Underflow)
    }

    /// Drops every queued element. Capacity is kept.
    pub fn clear(&mut self) {
        while self.pop().is_ok() {}
        self.head = 0;
        self.tail = 0;
    }

    /// Returns an iterator over queued elements, head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            offset: 0,
        }
    }

    /// Wraps the queue in a mutex for shared access.
    pub fn into_sync(self) -> SyncRingQueue<T> {
        SyncRingQueue {
            inner: Mutex::new(self),
        }
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.count <= self.slots.len(), "count exceeds capacity");
        debug_assert_eq!(
            self.tail,
            (self.head + self.count) % self.slots.len(),
            "tail out of step with head + count"
        );
    }
}

impl<T> std::fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingQueue")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("count", &self.count)
            .finish()
    }
}

/// Iterator over a [`RingQueue`], head to tail.
pub struct Iter<'a, T> {
    queue: &'a RingQueue<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.queue.count {
            return None;
        }
        let idx = (self.queue.head + self.offset) % self.queue.capacity();
        self.offset += 1;
        self.queue.slots[idx].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.count - self.offset;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// =============================================================================
// SyncRingQueue
// =============================================================================

/// A [`RingQueue`] guarded by a single mutex.
///
/// Every method acquires the lock, runs the corresponding [`RingQueue`]
/// operation and releases it. There is no timeout: a thread holding the
/// guard from [`lock`](Self::lock) stalls every other caller until it drops
/// the guard.
///
/// # Example
///
/// ```
/// use std::thread;
/// use strand_queue::RingQueue;
///
/// let queue = RingQueue::with_capacity(64).unwrap().into_sync();
///
/// thread::scope(|s| {
///     for t in 0..4 {
///         let queue = &queue;
///         s.spawn(move || {
///             for i in 0..16 {
///                 queue.push(t * 16 + i).unwrap();
///             }
///         });
///     }
/// });
///
/// assert_eq!(queue.len(), 64);
/// ```
pub struct SyncRingQueue<T> {
    inner: Mutex<RingQueue<T>>,
}

impl<T> SyncRingQueue<T> {
    /// Creates an empty mutex-guarded queue.
    ///
    /// # Errors
    ///
    /// Same as [`RingQueue::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        RingQueue::with_capacity(capacity).map(RingQueue::into_sync)
    }

    /// Locks the queue and pushes a value at the tail.
    ///
    /// # Errors
    ///
    /// Returns `Err(Overflow(value))` if the queue is full.
    #[inline]
    pub fn push(&self, value: T) -> Result<(), Overflow<T>> {
        self.inner.lock().push(value)
    }

    /// Locks the queue and pops the value at the head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the queue is empty.
    #[inline]
    pub fn pop(&self) -> Result<T, Error> {
        self.inner.lock().pop()
    }

    /// Locks the queue and clones the value at the head.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the queue is empty.
    pub fn front_cloned(&self) -> Result<T, Error>
    where
        T: Clone,
    {
        self.inner.lock().front().cloned()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns a snapshot of the number of queued elements.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the queue was empty when observed.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if the queue was full when observed.
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Locks the queue and drops every element.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Acquires the lock for a compound operation.
    pub fn lock(&self) -> MutexGuard<'_, RingQueue<T>> {
        self.inner.lock()
    }

    /// Returns the inner queue without locking. Requires exclusive access.
    pub fn get_mut(&mut self) -> &mut RingQueue<T> {
        self.inner.get_mut()
    }

    /// Consumes the wrapper, returning the inner queue.
    pub fn into_inner(self) -> RingQueue<T> {
        self.inner.into_inner()
    }
}

impl<T> std::fmt::Debug for SyncRingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(queue) => f.debug_tuple("SyncRingQueue").field(&*queue).finish(),
            None => f.write_str("SyncRingQueue(<locked>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn new_is_empty() {
        let queue: RingQueue<u64> = RingQueue::with_capacity(4).unwrap();
        assert!(queue.is_empty());
        assert!(!queue.is_full());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = RingQueue::<u64>::with_capacity(0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn fifo_order() {
        let mut queue = RingQueue::with_capacity(4).unwrap();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.push(3).unwrap();

        assert_eq!(queue.pop(), Ok(1));
        assert_eq!(queue.pop(), Ok(2));
        assert_eq!(queue.pop(), Ok(3));
        assert_eq!(queue.pop(), Err(Error::Underflow));
    }

    #[test]
    fn push_full_leaves_state_untouched() {
        let mut queue = RingQueue::with_capacity(2).unwrap();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert!(queue.is_full());

        let err = queue.push(3).unwrap_err();
        assert_eq!(err.into_inner(), 3);
        assert_eq!(queue.len(), 2);

        let values: Vec<_> = queue.iter().copied().collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn wraparound() {
        let mut queue = RingQueue::with_capacity(3).unwrap();

        for round in 0..10u32 {
            queue.push(round * 2).unwrap();
            queue.push(round * 2 + 1).unwrap();
            assert_eq!(queue.pop(), Ok(round * 2));
            assert_eq!(queue.pop(), Ok(round * 2 + 1));
        }

        assert!(queue.is_empty());
        assert_eq!(queue.tail, (queue.head + queue.count) % queue.capacity());
    }

    #[test]
    fn front_peeks_head() {
        let mut queue = RingQueue::with_capacity(2).unwrap();
        assert_eq!(queue.front(), Err(Error::Underflow));

        queue.push("a").unwrap();
        queue.push("b").unwrap();
        assert_eq!(queue.front(), Ok(&"a"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn clear_drops_elements() {
        use std::sync::Arc;

        let marker = Arc::new(());
        let mut queue = RingQueue::with_capacity(4).unwrap();
        queue.push(Arc::clone(&marker)).unwrap();
        queue.push(Arc::clone(&marker)).unwrap();
        assert_eq!(Arc::strong_count(&marker), 3);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(Arc::strong_count(&marker), 1);

        queue.push(Arc::clone(&marker)).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn iter_follows_wrap() {
        let mut queue = RingQueue::with_capacity(3).unwrap();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.pop().unwrap();
        queue.push(3).unwrap();
        queue.push(4).unwrap();

        let values: Vec<_> = queue.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(queue.iter().len(), 3);
    }

    #[test]
    fn sync_push_pop() {
        let queue = SyncRingQueue::with_capacity(2).unwrap();
        queue.push(10).unwrap();
        queue.push(20).unwrap();
        assert!(queue.push(30).is_err());
        assert!(queue.is_full());

        assert_eq!(queue.front_cloned(), Ok(10));
        assert_eq!(queue.pop(), Ok(10));
        assert_eq!(queue.pop(), Ok(20));
        assert_eq!(queue.pop(), Err(Error::Underflow));
    }

    #[test]
    fn sync_concurrent_producers() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 250;

        let queue = SyncRingQueue::with_capacity(THREADS * PER_THREAD).unwrap();

        thread::scope(|s| {
            for t in 0..THREADS {
                let queue = &queue;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        queue.push(t * PER_THREAD + i).unwrap();
                    }
                });
            }
        });

        let mut inner = queue.into_inner();
        assert!(inner.is_full());

        let mut seen: Vec<_> = std::iter::from_fn(|| inner.pop().ok()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..THREADS * PER_THREAD).collect::<Vec<_>>());
    }

    #[test]
    fn sync_lock_compound_operation() {
        let queue = SyncRingQueue::with_capacity(4).unwrap();
        {
            let mut guard = queue.lock();
            guard.push(1).unwrap();
            guard.push(2).unwrap();
            let first = guard.pop().unwrap();
            guard.push(first).unwrap();
        }

        let values: Vec<_> = queue.into_inner().iter().copied().collect();
        assert_eq!(values, vec![2, 1]);
    }
}
