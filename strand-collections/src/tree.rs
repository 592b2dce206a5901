//! Unbalanced binary search tree over slot storage.
//!
//! Nodes live in storage and link to their children by [`Key`]; the tree
//! owns the storage. Every operation is iterative, so a degenerate
//! (list-shaped) tree costs time but never call-stack depth.
//!
//! # Duplicates
//!
//! Insertion sends a key that compares equal to a node into that node's
//! *left* subtree. Lookup and deletion use a three-way comparison and stop at
//! the first equal node on the search path. With duplicates present, `delete`
//! removes one copy per call and `find` keeps reporting `true` until the last
//! copy is gone.
//!
//! # Example
//!
//! ```
//! use strand_collections::{BsTree, TraversalOrder};
//!
//! let mut tree = BsTree::new();
//! for k in [5, 3, 8, 3] {
//!     tree.insert(k).unwrap();
//! }
//!
//! assert!(tree.find(&3));
//! assert_eq!(tree.delete(&3), Ok(3));
//! assert!(tree.find(&3));
//! assert_eq!(tree.delete(&3), Ok(3));
//! assert!(!tree.find(&3));
//!
//! let mut seen = Vec::new();
//! tree.traverse(TraversalOrder::InOrder, |k| seen.push(*k));
//! assert_eq!(seen, vec![5, 8]);
//! ```

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::heap::{Compare, Natural};
use crate::{Error, GrowableStorage, Key, Storage, TryPushError};

/// A tree node: one key and two child links.
#[derive(Debug)]
pub struct TreeNode<T, K: Key = u32> {
    key: T,
    left: K,
    right: K,
}

/// When a traversal visits a node relative to its subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, node, right subtree. Yields keys in sorted order.
    InOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// The link that points at a node.
#[derive(Debug, Clone, Copy)]
enum Link<K> {
    Root,
    Left(K),
    Right(K),
}

/// A binary search tree with duplicates placed left.
///
/// # Type Parameters
///
/// - `T`: Key type stored in the tree
/// - `C`: Comparator (default [`Natural`])
/// - `K`: Storage key type (default `u32`)
/// - `S`: Node storage (default [`GrowableStorage`])
pub struct BsTree<T, C = Natural, K: Key = u32, S = GrowableStorage<TreeNode<T, K>, K>>
where
    S: Storage<TreeNode<T, K>, Key = K>,
{
    root: K,
    len: usize,
    cmp: C,
    storage: S,
    _marker: PhantomData<T>,
}

impl<T: Ord> BsTree<T> {
    /// Creates an empty tree ordered by `Ord`.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T: Ord> Default for BsTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Compare<T>> BsTree<T, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_storage(GrowableStorage::new(), cmp)
    }
}

impl<T, C, K, S> BsTree<T, C, K, S>
where
    C: Compare<T>,
    K: Key,
    S: Storage<TreeNode<T, K>, Key = K>,
{
    /// Creates an empty tree over `storage`.
    ///
    /// `storage` must be empty; a bounded storage caps the tree's size.
    pub fn with_storage(storage: S, cmp: C) -> Self {
        debug_assert!(storage.is_empty(), "tree storage must start empty");
        Self {
            root: K::NONE,
            len: 0,
            cmp,
            storage,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn node(&self, key: K) -> &TreeNode<T, K> {
        self.storage.get(key).expect("invalid key")
    }

    #[inline]
    fn link(&self, link: Link<K>) -> K {
        match link {
            Link::Root => self.root,
            Link::Left(parent) => self.node(parent).left,
            Link::Right(parent) => self.node(parent).right,
        }
    }

    #[inline]
    fn set_link(&mut self, link: Link<K>, child: K) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => {
                self.storage.get_mut(parent).expect("invalid key").left = child;
            }
            Link::Right(parent) => {
                self.storage.get_mut(parent).expect("invalid key").right = child;
            }
        }
    }

    /// Three-way search. Returns the link pointing at the first equal node.
    fn search(&self, key: &T) -> Option<(Link<K>, K)> {
        let mut link = Link::Root;
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            match self.cmp.compare(key, &node.key) {
                Ordering::Less => {
                    link = Link::Left(cur);
                    cur = node.left;
                }
                Ordering::Greater => {
                    link = Link::Right(cur);
                    cur = node.right;
                }
                Ordering::Equal => return Some((link, cur)),
            }
        }
        None
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if some key compares equal to `key`.
    pub fn find(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// Returns the storage key of the first node equal to `key`.
    pub fn find_key(&self, key: &T) -> Option<K> {
        self.search(key).map(|(_, node)| node)
    }

    /// Returns the value stored at a storage key.
    pub fn get(&self, key: K) -> Option<&T> {
        self.storage.get(key).map(|node| &node.key)
    }

    /// Returns the root's key.
    pub fn root(&self) -> Option<&T> {
        self.root.to_option().and_then(|key| self.get(key))
    }

    /// Returns the smallest key.
    pub fn min(&self) -> Option<&T> {
        let mut cur = self.root.to_option()?;
        while let Some(left) = self.node(cur).left.to_option() {
            cur = left;
        }
        self.get(cur)
    }

    /// Returns the largest key.
    pub fn max(&self) -> Option<&T> {
        let mut cur = self.root.to_option()?;
        while let Some(right) = self.node(cur).right.to_option() {
            cur = right;
        }
        self.get(cur)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push((self.root, 1));
        }
        while let Some((key, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(key);
            for child in [node.left, node.right] {
                if child.is_some() {
                    stack.push((child, depth + 1));
                }
            }
        }
        height
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Inserts `key` as a new leaf. Keys equal to an existing node go left.
    ///
    /// Returns the storage key of the new node.
    ///
    /// # Errors
    ///
    /// Hands `key` back if storage has no room.
    pub fn insert(&mut self, key: T) -> Result<K, TryPushError<T>> {
        let mut link = Link::Root;
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            if self.cmp.compare(&key, &node.key) == Ordering::Greater {
                link = Link::Right(cur);
                cur = node.right;
            } else {
                link = Link::Left(cur);
                cur = node.left;
            }
        }

        let leaf = self
            .storage
            .try_insert(TreeNode {
                key,
                left: K::NONE,
                right: K::NONE,
            })
            .map_err(|err| err.map(|node| node.key))?;
        self.set_link(link, leaf);
        self.len += 1;
        Ok(leaf)
    }

    /// Removes one node equal to `key` and returns its key.
    ///
    /// A node with two children takes its in-order predecessor's key, and
    /// the predecessor's node is removed instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no key compares equal.
    pub fn delete(&mut self, key: &T) -> Result<T, Error> {
        let Some((link, target)) = self.search(key) else {
            tracing::debug!(len = self.len, "tree delete: key not found");
            return Err(Error::NotFound);
        };

        let node = self.node(target);
        let (left, right) = (node.left, node.right);

        let removed = if left.is_some() && right.is_some() {
            let predecessor = self.take_rightmost(Link::Left(target))?;
            let node = self.storage.get_mut(target).expect("invalid key");
            std::mem::replace(&mut node.key, predecessor)
        } else {
            let child = if left.is_some() { left } else { right };
            self.set_link(link, child);
            self.storage
                .remove(target)
                .map(|node| node.key)
                .ok_or(Error::NotFound)?
        };

        self.len -= 1;
        Ok(removed)
    }

    /// Detaches the rightmost node of the subtree hanging from `link`,
    /// promoting its left child, and returns its key.
    fn take_rightmost(&mut self, mut link: Link<K>) -> Result<T, Error> {
        let mut cur = self.link(link);
        while let Some(right) = self.node(cur).right.to_option() {
            link = Link::Right(cur);
            cur = right;
        }

        let left = self.node(cur).left;
        self.set_link(link, left);
        self.storage
            .remove(cur)
            .map(|node| node.key)
            .ok_or(Error::NotFound)
    }

    /// Removes every node, children before parents.
    pub fn clear(&mut self) {
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push((self.root, false));
        }
        while let Some((key, expanded)) = stack.pop() {
            if expanded {
                self.storage.remove(key);
                continue;
            }
            let node = self.node(key);
            let (left, right) = (node.left, node.right);
            stack.push((key, true));
            if right.is_some() {
                stack.push((right, false));
            }
            if left.is_some() {
                stack.push((left, false));
            }
        }

        tracing::debug!(len = self.len, "tree cleared");
        self.root = K::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Visits every key in `order`.
    ///
    /// The visitor only reads; use [`delete`](Self::delete) or
    /// [`clear`](Self::clear) to remove nodes.
    pub fn traverse<F>(&self, order: TraversalOrder, mut visit: F)
    where
        F: FnMut(&T),
    {
        if self.root.is_none() {
            return;
        }
        match order {
            TraversalOrder::PreOrder => {
                let mut stack = vec![self.root];
                while let Some(key) = stack.pop() {
                    let node = self.node(key);
                    visit(&node.key);
                    if node.right.is_some() {
                        stack.push(node.right);
                    }
                    if node.left.is_some() {
                        stack.push(node.left);
                    }
                }
            }
            TraversalOrder::InOrder => {
                for key in self.iter() {
                    visit(key);
                }
            }
            TraversalOrder::PostOrder => {
                let mut stack = vec![(self.root, false)];
                while let Some((key, expanded)) = stack.pop() {
                    let node = self.node(key);
                    if expanded {
                        visit(&node.key);
                        continue;
                    }
                    stack.push((key, true));
                    if node.right.is_some() {
                        stack.push((node.right, false));
                    }
                    if node.left.is_some() {
                        stack.push((node.left, false));
                    }
                }
            }
        }
    }

    /// Returns an iterator over keys in order.
    pub fn iter(&self) -> Iter<'_, T, K, S> {
        let mut iter = Iter {
            storage: &self.storage,
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.descend_left(self.root);
        iter
    }

    /// Checks the ordering invariant: every key in a left subtree compares
    /// `<=` its ancestor, every key in a right subtree compares `>`.
    pub fn validate(&self) -> bool {
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push((self.root, K::NONE, K::NONE));
        }
        let mut count = 0;
        while let Some((key, lower, upper)) = stack.pop() {
            let Some(node) = self.storage.get(key) else {
                return false;
            };
            if let Some(lo) = lower.to_option().and_then(|k| self.get(k)) {
                if self.cmp.compare(&node.key, lo) != Ordering::Greater {
                    return false;
                }
            }
            if let Some(hi) = upper.to_option().and_then(|k| self.get(k)) {
                if self.cmp.compare(&node.key, hi) == Ordering::Greater {
                    return false;
                }
            }
            count += 1;
            if node.left.is_some() {
                stack.push((node.left, lower, key));
            }
            if node.right.is_some() {
                stack.push((node.right, key, upper));
            }
        }
        count == self.len
    }
}

impl<T, C, K, S> std::fmt::Debug for BsTree<T, C, K, S>
where
    K: Key,
    S: Storage<TreeNode<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BsTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

/// In-order iterator over a [`BsTree`].
pub struct Iter<'a, T, K: Key, S> {
    storage: &'a S,
    stack: Vec<&'a TreeNode<T, K>>,
    remaining: usize,
}

impl<'a, T, K, S> Iter<'a, T, K, S>
where
    K: Key,
    S: Storage<TreeNode<T, K>, Key = K>,
{
    fn descend_left(&mut self, mut key: K) {
        let storage = self.storage;
        while let Some(node) = storage.get(key) {
            self.stack.push(node);
            key = node.left;
        }
    }
}

impl<'a, T, K, S> Iterator for Iter<'a, T, K, S>
where
    K: Key,
    S: Storage<TreeNode<T, K>, Key = K>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.descend_left(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
