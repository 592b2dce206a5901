//! Error types shared by every collection in this crate.

use std::fmt;

/// Errors returned by collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Insertion attempted on a structure already at capacity.
    #[error("capacity exceeded")]
    Overflow,
    /// Removal or peek attempted on an empty structure.
    #[error("structure is empty")]
    Underflow,
    /// The requested element is not present.
    #[error("element not found")]
    NotFound,
    /// Memory for a node or array could not be obtained.
    #[error("allocation failed")]
    AllocationFailure,
    /// A parameter was malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<strand_queue::Error> for Error {
    fn from(err: strand_queue::Error) -> Self {
        match err {
            strand_queue::Error::Overflow => Error::Overflow,
            strand_queue::Error::Underflow => Error::Underflow,
            strand_queue::Error::AllocationFailure => Error::AllocationFailure,
            strand_queue::Error::InvalidArgument(msg) => Error::InvalidArgument(msg),
        }
    }
}

/// A rejected insertion. Carries the value back to the caller.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TryPushError<T> {
    /// The structure or its storage is at capacity.
    Overflow(T),
    /// Storage could not grow to hold the value.
    AllocationFailure(T),
}

impl<T> TryPushError<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Overflow(v) | Self::AllocationFailure(v) => v,
        }
    }

    /// Returns `true` if the insertion failed because of capacity.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow(_))
    }

    /// Returns `true` if the insertion failed because storage could not grow.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailure(_))
    }

    /// Maps the carried value, keeping the failure kind.
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> TryPushError<U> {
        match self {
            Self::Overflow(v) => TryPushError::Overflow(f(v)),
            Self::AllocationFailure(v) => TryPushError::AllocationFailure(f(v)),
        }
    }
}

impl<T> fmt::Debug for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow(_) => f.write_str("Overflow(..)"),
            Self::AllocationFailure(_) => f.write_str("AllocationFailure(..)"),
        }
    }
}

impl<T> fmt::Display for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow(_) => write!(f, "capacity exceeded"),
            Self::AllocationFailure(_) => write!(f, "allocation failed"),
        }
    }
}

impl<T> std::error::Error for TryPushError<T> {}

impl<T> From<TryPushError<T>> for Error {
    fn from(err: TryPushError<T>) -> Self {
        match err {
            TryPushError::Overflow(_) => Error::Overflow,
            TryPushError::AllocationFailure(_) => Error::AllocationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_push_error_returns_value() {
        let err = TryPushError::Overflow(String::from("order"));
        assert!(err.is_overflow());
        assert!(!err.is_allocation_failure());
        assert_eq!(err.into_inner(), "order");

        let err = TryPushError::AllocationFailure(7u8);
        assert!(err.is_allocation_failure());
        assert_eq!(err.into_inner(), 7);
    }

    #[test]
    fn converts_to_error() {
        let err: Error = TryPushError::Overflow(1).into();
        assert_eq!(err, Error::Overflow);

        let err: Error = TryPushError::AllocationFailure(1).into();
        assert_eq!(err, Error::AllocationFailure);
    }

    #[test]
    fn queue_errors_convert() {
        assert_eq!(Error::from(strand_queue::Error::Underflow), Error::Underflow);
        assert_eq!(
            Error::from(strand_queue::Error::InvalidArgument("x")),
            Error::InvalidArgument("x")
        );
    }

    #[test]
    fn display_messages() {
        assert_eq!(Error::NotFound.to_string(), "element not found");
        assert_eq!(
            Error::InvalidArgument("capacity must be > 0").to_string(),
            "invalid argument: capacity must be > 0"
        );
        assert_eq!(TryPushError::Overflow(()).to_string(), "capacity exceeded");
    }
}
