//! # strand-queue
//!
//! Fixed-capacity ring queue and array stack, each with an optional
//! mutex-guarded form.
//!
//! ## Structures
//!
//! - [`RingQueue`]: FIFO over a circular array
//! - [`ArrayStack`]: LIFO over an array with a top index
//! - [`SyncRingQueue`] / [`SyncArrayStack`]: the same structures behind a
//!   single [`parking_lot::Mutex`], usable from `&self` across threads
//!
//! Capacity is chosen at construction and never changes. A push on a full
//! structure returns the value in [`Overflow`]; a pop on an empty one returns
//! [`Error::Underflow`]. Neither touches the structure's state.
//!
//! ## Example
//!
//! ```
//! use strand_queue::{ArrayStack, Error, RingQueue};
//!
//! let mut queue = RingQueue::with_capacity(4).unwrap();
//! let mut stack = ArrayStack::with_capacity(4).unwrap();
//!
//! for i in 0..4 {
//!     queue.push(i).unwrap();
//!     stack.push(i).unwrap();
//! }
//!
//! assert_eq!(queue.pop(), Ok(0));
//! assert_eq!(stack.pop(), Ok(3));
//!
//! let mut empty: RingQueue<u8> = RingQueue::with_capacity(1).unwrap();
//! assert_eq!(empty.pop(), Err(Error::Underflow));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod error;
pub mod ring;
pub mod stack;

pub use error::{Error, Overflow};
pub use ring::{RingQueue, SyncRingQueue};
pub use stack::{ArrayStack, SyncArrayStack};
