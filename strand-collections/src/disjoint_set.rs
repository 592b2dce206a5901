//! Disjoint-set forest (union-find) over elements `0..n`.
//!
//! Each set is a tree of parent links whose root is the set's
//! representative. [`find_set`](DisjointSet::find_set) compresses the path it
//! walks, and [`link`](DisjointSet::link) hangs the lower-ranked root under
//! the other.
//!
//! The surviving root's rank is incremented on every link, not only when the
//! two ranks tie. Rank stays an upper bound on tree height either way; it
//! just grows faster than strictly needed.
//!
//! # Example
//!
//! ```
//! use strand_collections::DisjointSet;
//!
//! let mut sets = DisjointSet::make_set(6).unwrap();
//! sets.unite(0, 1).unwrap();
//! sets.unite(1, 2).unwrap();
//! sets.unite(4, 5).unwrap();
//!
//! assert!(sets.same(0, 2).unwrap());
//! assert!(!sets.same(2, 4).unwrap());
//! ```

use crate::Error;

/// A fixed-size disjoint-set forest.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    /// Creates `n` singleton sets, each its own representative with rank 0.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `n` is zero
    /// - [`Error::AllocationFailure`] if the arrays cannot be reserved
    pub fn make_set(n: usize) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("set count must be > 0"));
        }

        let mut parent = Vec::new();
        parent
            .try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailure)?;
        let mut rank = Vec::new();
        rank.try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailure)?;

        parent.extend(0..n);
        rank.resize(n, 0);

        tracing::debug!(n, "disjoint set created");
        Ok(Self { parent, rank })
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Always `false`: a forest holds at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    #[inline]
    fn check(&self, x: usize) -> Result<(), Error> {
        if x < self.parent.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument("element out of range"))
        }
    }

    /// Returns the representative of `x`'s set.
    ///
    /// Every element on the path from `x` is re-pointed straight at the
    /// representative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `x` is out of range.
    pub fn find_set(&mut self, x: usize) -> Result<usize, Error> {
        self.check(x)?;

        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut cur = x;
        while cur != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        Ok(root)
    }

    /// Joins two distinct representatives.
    ///
    /// `y` goes under `x` unless `x` has the lower rank. The new root's rank
    /// is then incremented. Returns the new root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either index is out of range,
    /// is not a representative, or if `x == y`.
    pub fn link(&mut self, x: usize, y: usize) -> Result<usize, Error> {
        self.check(x)?;
        self.check(y)?;
        if self.parent[x] != x || self.parent[y] != y {
            return Err(Error::InvalidArgument("link requires representatives"));
        }
        if x == y {
            return Err(Error::InvalidArgument("link requires distinct sets"));
        }

        let (root, child) = if self.rank[x] < self.rank[y] {
            (y, x)
        } else {
            (x, y)
        };
        self.parent[child] = root;
        self.rank[root] += 1;
        Ok(root)
    }

    /// Merges the sets holding `x` and `y`.
    ///
    /// Returns `false`, changing nothing, if they already share a set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either index is out of range.
    pub fn unite(&mut self, x: usize, y: usize) -> Result<bool, Error> {
        let rx = self.find_set(x)?;
        let ry = self.find_set(y)?;
        if rx == ry {
            return Ok(false);
        }
        self.link(rx, ry)?;
        Ok(true)
    }

    /// Returns `true` if `x` and `y` share a set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either index is out of range.
    pub fn same(&mut self, x: usize, y: usize) -> Result<bool, Error> {
        Ok(self.find_set(x)? == self.find_set(y)?)
    }

    /// Returns the rank of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `x` is out of range.
    pub fn rank(&self, x: usize) -> Result<usize, Error> {
        self.check(x)?;
        Ok(self.rank[x])
    }

    /// Returns the number of distinct sets.
    pub fn set_count(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(i, &p)| i == p)
            .count()
    }
}
