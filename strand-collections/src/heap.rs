//! Fixed-capacity binary max-heap.
//!
//! Positions are 1-based: position `p` has parent `p / 2` and children `2p`
//! and `2p + 1`. Position `p` lives at `heap[p - 1]`.
//!
//! Ordering comes from a [`Compare`] implementation. [`Natural`] uses `Ord`;
//! any `Fn(&T, &T) -> Ordering` closure works too. Equal elements are never
//! swapped, so ties keep whatever relative placement the sifts left them in.
//!
//! # Example
//!
//! ```
//! use strand_collections::MaxHeap;
//!
//! let mut heap = MaxHeap::with_capacity(5).unwrap();
//! for v in [3, 1, 4, 1, 5] {
//!     heap.push(v).unwrap();
//! }
//!
//! let order: Vec<_> = std::iter::from_fn(|| heap.pop().ok()).collect();
//! assert_eq!(order, vec![5, 4, 3, 1, 1]);
//! ```
//!
//! # Custom Ordering
//!
//! ```
//! use strand_collections::MaxHeap;
//!
//! struct Job {
//!     deadline: u64,
//! }
//!
//! // Earliest deadline first: invert the comparison.
//! let mut heap = MaxHeap::with_comparator(8, |a: &Job, b: &Job| b.deadline.cmp(&a.deadline)).unwrap();
//! heap.push(Job { deadline: 30 }).unwrap();
//! heap.push(Job { deadline: 10 }).unwrap();
//!
//! assert_eq!(heap.top().unwrap().deadline, 10);
//! ```

use std::cmp::Ordering;

use crate::{Error, TryPushError};

/// A total order over `T`.
///
/// `compare(a, b)` returns `Less`, `Equal` or `Greater` as `a` ranks below,
/// level with, or above `b`.
pub trait Compare<T: ?Sized> {
    /// Compares two elements.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders elements by their `Ord` implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// A fixed-capacity max-heap.
pub struct MaxHeap<T, C = Natural> {
    heap: Vec<T>,
    capacity: usize,
    cmp: C,
}

impl<T: Ord> MaxHeap<T> {
    /// Creates an empty heap ordered by `Ord`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` is zero
    /// - [`Error::AllocationFailure`] if the array cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_comparator(capacity, Natural)
    }
}

impl<T, C: Compare<T>> MaxHeap<T, C> {
    /// Creates an empty heap ordered by `cmp`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `capacity` is zero
    /// - [`Error::AllocationFailure`] if the array cannot be reserved
    pub fn with_comparator(capacity: usize, cmp: C) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be > 0"));
        }
        let mut heap = Vec::new();
        heap.try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure)?;

        tracing::debug!(capacity, "max heap created");
        Ok(Self {
            heap,
            capacity,
            cmp,
        })
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if the heap is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() == self.capacity
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the largest element without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the heap is empty.
    #[inline]
    pub fn top(&self) -> Result<&T, Error> {
        self.heap.first().ok_or(Error::Underflow)
    }

    /// Inserts an element.
    ///
    /// # Errors
    ///
    /// Returns `TryPushError::Overflow(value)` at capacity; the heap is left
    /// unchanged.
    pub fn push(&mut self, value: T) -> Result<(), TryPushError<T>> {
        if self.is_full() {
            tracing::trace!(capacity = self.capacity, "max heap push rejected: full");
            return Err(TryPushError::Overflow(value));
        }
        // Capacity is reserved up front; this never reallocates.
        self.heap.push(value);
        self.sift_up(self.heap.len());
        Ok(())
    }

    /// Removes and returns the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the heap is empty.
    pub fn pop(&mut self) -> Result<T, Error> {
        if self.heap.is_empty() {
            tracing::trace!("max heap pop rejected: empty");
            return Err(Error::Underflow);
        }
        // Last element moves into the root.
        let top = self.heap.swap_remove(0);
        self.sift_down(1);
        Ok(top)
    }

    /// Drops every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Returns the elements in heap-array order.
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    /// Consumes the heap, returning elements in descending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Ok(v) = self.pop() {
            out.push(v);
        }
        out
    }

    /// Checks that no child outranks its parent.
    pub fn validate(&self) -> bool {
        (2..=self.heap.len()).all(|p| {
            self.cmp.compare(self.at(p), self.at(p / 2)) != Ordering::Greater
        })
    }

    #[inline]
    fn at(&self, pos: usize) -> &T {
        &self.heap[pos - 1]
    }

    #[inline]
    fn outranks(&self, a: usize, b: usize) -> bool {
        self.cmp.compare(self.at(a), self.at(b)) == Ordering::Greater
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 1 {
            let parent = pos / 2;
            if !self.outranks(pos, parent) {
                break;
            }
            self.heap.swap(pos - 1, parent - 1);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos;
            let right = left + 1;
            let mut largest = pos;

            if left <= len && self.outranks(left, largest) {
                largest = left;
            }
            if right <= len && self.outranks(right, largest) {
                largest = right;
            }
            if largest == pos {
                break;
            }
            self.heap.swap(pos - 1, largest - 1);
            pos = largest;
        }
    }
}

impl<T, C> std::fmt::Debug for MaxHeap<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaxHeap")
            .field("len", &self.heap.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
