//! Stable handles into slot storage.
//!
//! Every collection in this crate links its nodes by [`Key`] rather than by
//! pointer. A key stays valid until the node it names is removed, no matter
//! how many other nodes come and go.

/// Index type naming a slot in storage.
///
/// `NONE` is the null link. Storage never hands it out, so the usable key
/// space is `0..NONE.as_usize()`.
///
/// # Example
///
/// ```
/// use strand_collections::Key;
///
/// let key: u32 = 42;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// ```
///
/// # Custom Key Types
///
/// ```
/// use strand_collections::Key;
///
/// #[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// struct VertexId(u32);
///
/// impl Key for VertexId {
///     const NONE: Self = VertexId(u32::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         VertexId(val as u32)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
/// ```
pub trait Key: Copy + Eq + std::fmt::Debug {
    /// The null link.
    const NONE: Self;

    /// Creates a key from a slot position.
    ///
    /// Callers keep `val < NONE.as_usize()`.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the null link.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this names a slot.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts the null link to `None`.
    #[inline]
    fn to_option(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

macro_rules! impl_key {
    ($($ty:ty),* $(,)?) => {$(
        impl Key for $ty {
            const NONE: Self = <$ty>::MAX;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_usize(val: usize) -> Self {
                val as $ty
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn as_usize(&self) -> usize {
                *self as usize
            }
        }
    )*};
}

impl_key!(u8, u16, u32, u64, usize);
