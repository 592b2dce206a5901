//! Fixed-capacity LIFO stack.
//!
//! An array with a top index. Slots `0..len` are occupied; the top element
//! lives at `len - 1`. [`ArrayStack::top_index`] reports that position, or
//! `None` for an empty stack.
//!
//! Like [`RingQueue`](crate::RingQueue), the stack comes in an unsynchronized
//! form ([`ArrayStack`], `&mut self`) and a mutex-guarded one
//! ([`SyncArrayStack`], `&self`).
//!
//! # Example
//!
//! ```
//! use strand_queue::ArrayStack;
//!
//! let mut stack = ArrayStack::with_capacity(2).unwrap();
//! stack.push('a').unwrap();
//! stack.push('b').unwrap();
//! assert!(stack.is_full());
//!
//! assert_eq!(stack.pop(), Ok('b'));
//! assert_eq!(stack.pop(), Ok('a'));
//! ```

use parking_lot::{Mutex, MutexGuard};

use crate::error::{Error, Overflow, allocate_slots};

/// A fixed-capacity LIFO stack backed by an array.
pub struct ArrayStack<T> {
    slots: Box<[Option<T>]>,
    len: usize,
}

impl<T> ArrayStack<T> {
    /// Creates an empty stack holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` is zero
    /// - [`Error::AllocationFailure`] if the backing array cannot be allocated
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let slots = allocate_slots(capacity)?;
        tracing::debug!(capacity, "array stack created");
        Ok(Self { slots, len: 0 })
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of stacked elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the stack holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Position of the top element, or `None` when empty.
    #[inline]
    pub fn top_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Pushes a value onto the top.
    ///
    /// # Errors
    ///
    /// Returns `Err(Overflow(value))` if the stack is full. The stack is left
    /// unchanged.
    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), Overflow<T>> {
        if self.is_full() {
            tracing::trace!(capacity = self.capacity(), "array stack push rejected: full");
            return Err(Overflow(value));
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the top element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Result<T, Error> {
        let Some(top) = self.top_index() else {
            tracing::trace!("array stack pop rejected: empty");
            return Err(Error::Underflow);
        };
        self.len = top;
        self.slots[top].take().ok_or(Error::Underflow)
    }

    /// Returns a reference to the top element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the stack is empty.
    #[inline]
    pub fn peek(&self) -> Result<&T, Error> {
        let top = self.top_index().ok_or(Error::Underflow)?;
        self.slots[top].as_ref().ok_or(Error::Underflow)
    }

    /// Returns a mutable reference to the top element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the stack is empty.
    #[inline]
    pub fn peek_mut(&mut self) -> Result<&mut T, Error> {
        let top = self.top_index().ok_or(Error::Underflow)?;
        self.slots[top].as_mut().ok_or(Error::Underflow)
    }

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    /// Returns an iterator from top to bottom.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.slots[..self.len].iter().rev().filter_map(Option::as_ref)
    }

    /// Wraps the stack in a mutex for shared access.
    pub fn into_sync(self) -> SyncArrayStack<T> {
        SyncArrayStack {
            inner: Mutex::new(self),
        }
    }
}

impl<T> std::fmt::Debug for ArrayStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayStack")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .finish()
    }
}

// =============================================================================
// SyncArrayStack
// =============================================================================

/// An [`ArrayStack`] guarded by a single mutex.
///
/// Each method is one lock acquisition around the corresponding
/// [`ArrayStack`] operation.
pub struct SyncArrayStack<T> {
    inner: Mutex<ArrayStack<T>>,
}

impl<T> SyncArrayStack<T> {
    /// Creates an empty mutex-guarded stack.
    ///
    /// # Errors
    ///
    /// Same as [`ArrayStack::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        ArrayStack::with_capacity(capacity).map(ArrayStack::into_sync)
    }

    /// Locks the stack and pushes a value.
    ///
    /// # Errors
    ///
    /// Returns `Err(Overflow(value))` if the stack is full.
    #[inline]
    pub fn push(&self, value: T) -> Result<(), Overflow<T>> {
        self.inner.lock().push(value)
    }

    /// Locks the stack and pops the top element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the stack is empty.
    #[inline]
    pub fn pop(&self) -> Result<T, Error> {
        self.inner.lock().pop()
    }

    /// Locks the stack and clones the top element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the stack is empty.
    pub fn peek_cloned(&self) -> Result<T, Error>
    where
        T: Clone,
    {
        self.inner.lock().peek().cloned()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Returns a snapshot of the number of stacked elements.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the stack was empty when observed.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if the stack was full when observed.
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Locks the stack and drops every element.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Acquires the lock for a compound operation.
    pub fn lock(&self) -> MutexGuard<'_, ArrayStack<T>> {
        self.inner.lock()
    }

    /// Returns the inner stack without locking. Requires exclusive access.
    pub fn get_mut(&mut self) -> &mut ArrayStack<T> {
        self.inner.get_mut()
    }

    /// Consumes the wrapper, returning the inner stack.
    pub fn into_inner(self) -> ArrayStack<T> {
        self.inner.into_inner()
    }
}

impl<T> std::fmt::Debug for SyncArrayStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(stack) => f.debug_tuple("SyncArrayStack").field(&*stack).finish(),
            None => f.write_str("SyncArrayStack(<locked>)"),
        }
    }
}
