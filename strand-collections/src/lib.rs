//! Index-linked collections over external slot storage.
//!
//! Structures in this crate link their elements by key instead of by
//! pointer. A [`Storage`] owns the nodes and hands out stable keys; lists
//! hold only the keys of their ends and thread the rest through the nodes.
//!
//! ```text
//! Storage (BoxedStorage, GrowableStorage, Slab) - owns nodes, stable keys
//! RingList / BucketList                         - coordinate keys
//! ```
//!
//! Removing a node never invalidates another node's key, and several lists
//! can share one storage.
//!
//! # Quick Start
//!
//! ```
//! use strand_collections::{GrowableRingStorage, RingList};
//!
//! let mut storage: GrowableRingStorage<u64> = GrowableRingStorage::new();
//! let mut list: RingList<u64, _> = RingList::try_new(&mut storage).unwrap();
//!
//! let a = list.try_push_back(&mut storage, 1).unwrap();
//! list.try_push_back(&mut storage, 2).unwrap();
//! list.try_push_front(&mut storage, 0).unwrap();
//!
//! // O(1) removal from anywhere.
//! assert_eq!(list.remove(&mut storage, a), Some(1));
//! assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), vec![0, 2]);
//! ```
//!
//! # Moving Between Lists
//!
//! `unlink` leaves the node allocated and detached; `link_back` puts it in
//! another list. The key stays valid throughout.
//!
//! ```
//! use strand_collections::{BoxedRingStorage, RingList};
//!
//! let mut storage: BoxedRingStorage<u64> = BoxedRingStorage::with_capacity(16).unwrap();
//! let mut ready: RingList<u64, _> = RingList::try_new(&mut storage).unwrap();
//! let mut parked: RingList<u64, _> = RingList::try_new(&mut storage).unwrap();
//!
//! let key = ready.try_push_back(&mut storage, 42).unwrap();
//! ready.unlink(&mut storage, key);
//! parked.link_back(&mut storage, key);
//!
//! assert!(ready.is_empty());
//! assert_eq!(parked.get(&storage, key), Some(&42));
//! ```
//!
//! # Same Storage Instance
//!
//! Every call on a list must pass the storage the list was created with.
//! Passing another one is a logic error: it panics on an invalid key or
//! silently corrupts both structures.
//!
//! # Data Structures
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`RingList`] | Queues, LRU lists, adjacency lists | O(1) link/unlink/splice |
//! | [`BucketList`] | Hash table chains | O(1) push front and unlink |
//! | [`MaxHeap`] | Priority queues | O(log n) push/pop |
//! | [`BsTree`] | Ordered sets, duplicates allowed | O(h) insert/find/delete |
//! | [`DisjointSet`] | Connectivity, Kruskal | near-O(1) unite/find |
//! | [`Graph`] | Directed weighted graphs | O(1) edge insert, BFS |
//!
//! # Storage Options
//!
//! | Storage | Capacity | Full / exhausted |
//! |---------|----------|------------------|
//! | [`BoxedStorage`] | Fixed at construction | `TryPushError::Overflow` |
//! | [`GrowableStorage`] | Grows on demand | `TryPushError::AllocationFailure` |
//! | `slab::Slab` | Grows on demand | `TryPushError::AllocationFailure` |
//!
//! # Diagnostics
//!
//! Rejected operations are reported at `trace` level and construction,
//! teardown and conversions at `debug` level through [`tracing`]. Install a
//! subscriber to see them.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod error;

pub mod disjoint_set;
pub mod graph;
pub mod heap;
pub mod hlist;
pub mod key;
pub mod ring;
pub mod storage;
pub mod tree;

pub use disjoint_set::DisjointSet;
pub use error::{Error, TryPushError};
pub use graph::{AdjacencyMatrix, Edge, Graph, WEIGHT_INFINITY};
pub use heap::{Compare, MaxHeap, Natural};
pub use hlist::{BucketList, BucketNode, GrowableBucketStorage};
pub use key::Key;
pub use ring::{BoxedRingStorage, GrowableRingStorage, RingList, RingNode};
pub use storage::{BoxedStorage, GrowableStorage, Storage};
pub use tree::{BsTree, TraversalOrder, TreeNode};

#[cfg(feature = "slab")]
pub use ring::SlabRingStorage;
