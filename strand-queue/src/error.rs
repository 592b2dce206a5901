//! Error types for queue and stack operations.

use std::fmt;

/// Errors returned by [`RingQueue`](crate::RingQueue) and
/// [`ArrayStack`](crate::ArrayStack) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Push attempted on a structure already at capacity.
    #[error("capacity exceeded")]
    Overflow,
    /// Pop or peek attempted on an empty structure.
    #[error("structure is empty")]
    Underflow,
    /// The backing array could not be allocated.
    #[error("allocation failed")]
    AllocationFailure,
    /// A construction parameter was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// A push rejected because the structure is full.
///
/// Contains the value that could not be stored, so the caller can retry or
/// route it elsewhere.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Overflow<T>(pub T);

impl<T> Overflow<T> {
    /// Returns the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Overflow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capacity exceeded")
    }
}

impl<T> fmt::Debug for Overflow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Overflow(..)")
    }
}

impl<T> std::error::Error for Overflow<T> {}

impl<T> From<Overflow<T>> for Error {
    fn from(_: Overflow<T>) -> Self {
        Error::Overflow
    }
}

/// Allocates `capacity` empty slots, surfacing allocation failure.
pub(crate) fn allocate_slots<T>(capacity: usize) -> Result<Box<[Option<T>]>, Error> {
    if capacity == 0 {
        return Err(Error::InvalidArgument("capacity must be > 0"));
    }

    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::AllocationFailure)?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}
