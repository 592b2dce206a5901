//! Directed weighted graph over adjacency lists.
//!
//! Vertices are `0..n`. Each vertex owns a [`RingList`] of [`Edge`] records,
//! and every list node lives in one storage shared by the whole graph.
//!
//! Edges are appended at the tail, so a vertex's edges come back in insertion
//! order. Nothing sorts them; callers wanting ascending targets insert in
//! ascending order. Duplicate edges and self-loops are kept as inserted.
//!
//! [`AdjacencyMatrix`] is the dense form. Absent edges hold
//! [`WEIGHT_INFINITY`]; the diagonal defaults to `0`.
//!
//! # Example
//!
//! ```
//! use strand_collections::{Graph, WEIGHT_INFINITY};
//!
//! let mut g = Graph::new(3).unwrap();
//! g.insert_edge(0, 1, 7).unwrap();
//! g.insert_edge(1, 2, 2).unwrap();
//!
//! let m = g.to_matrix().unwrap();
//! assert_eq!(m.get(0, 1), Ok(7));
//! assert_eq!(m.get(0, 2), Ok(WEIGHT_INFINITY));
//! assert_eq!(m.get(2, 2), Ok(0));
//!
//! assert_eq!(g.shortest_path(0, 2).unwrap(), Some(vec![0, 1, 2]));
//! ```

use strand_queue::RingQueue;

use crate::{Error, GrowableRingStorage, RingList};

/// Weight marking "no edge" in an [`AdjacencyMatrix`].
pub const WEIGHT_INFINITY: i32 = 1 << 20;

/// An outgoing edge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Vertex the edge points at.
    pub target: usize,
    /// Edge weight.
    pub weight: i32,
}

type EdgeStorage = GrowableRingStorage<Edge>;

// ============================================================================
// Adjacency List
// ============================================================================

/// A directed graph with a fixed vertex count.
pub struct Graph {
    storage: EdgeStorage,
    vertices: Vec<RingList<Edge, EdgeStorage>>,
    edge_count: usize,
}

impl Graph {
    /// Creates a graph of `n` vertices and no edges.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `n` is zero
    /// - [`Error::AllocationFailure`] if the vertex lists cannot be allocated
    pub fn new(n: usize) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("vertex count must be > 0"));
        }

        let mut storage = EdgeStorage::with_capacity(n)?;
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailure)?;
        for _ in 0..n {
            vertices.push(RingList::try_new(&mut storage)?);
        }

        tracing::debug!(vertices = n, "graph created");
        Ok(Self {
            storage,
            vertices,
            edge_count: 0,
        })
    }

    /// Builds a graph from a dense matrix.
    ///
    /// Every cell not equal to [`WEIGHT_INFINITY`] becomes an edge, diagonal
    /// zeros included. Cells are read row by row, so each vertex's edges are
    /// ordered by target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if an edge cannot be allocated.
    pub fn from_matrix(matrix: &AdjacencyMatrix) -> Result<Self, Error> {
        let n = matrix.order();
        let mut graph = Self::new(n)?;
        for (source, row) in matrix.cells.chunks_exact(n).enumerate() {
            for (target, &weight) in row.iter().enumerate() {
                if weight != WEIGHT_INFINITY {
                    graph.insert_edge(source, target, weight)?;
                }
            }
        }

        tracing::debug!(
            vertices = n,
            edges = graph.edge_count,
            "graph built from matrix"
        );
        Ok(graph)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    fn check(&self, vertex: usize) -> Result<(), Error> {
        if vertex < self.vertices.len() {
            Ok(())
        } else {
            Err(Error::InvalidArgument("vertex out of range"))
        }
    }

    /// Appends the edge `source -> target` to `source`'s list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either vertex is out of range, or if
    ///   `weight` is [`WEIGHT_INFINITY`]
    /// - [`Error::AllocationFailure`] if the edge record cannot be allocated
    pub fn insert_edge(&mut self, source: usize, target: usize, weight: i32) -> Result<(), Error> {
        self.check(source)?;
        self.check(target)?;
        if weight == WEIGHT_INFINITY {
            return Err(Error::InvalidArgument("weight reserved for absent edges"));
        }

        self.vertices[source].try_push_back(&mut self.storage, Edge { target, weight })?;
        self.edge_count += 1;
        Ok(())
    }

    /// Returns `source`'s outgoing edges in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `source` is out of range.
    pub fn edges(
        &self,
        source: usize,
    ) -> Result<impl DoubleEndedIterator<Item = &Edge> + ExactSizeIterator, Error> {
        self.check(source)?;
        Ok(self.vertices[source].iter(&self.storage))
    }

    /// Returns the number of edges leaving `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `source` is out of range.
    pub fn out_degree(&self, source: usize) -> Result<usize, Error> {
        self.check(source)?;
        Ok(self.vertices[source].len())
    }

    /// Removes every edge. Vertices stay.
    pub fn clear(&mut self) {
        for list in &mut self.vertices {
            list.clear(&mut self.storage);
        }
        tracing::debug!(edges = self.edge_count, "graph cleared");
        self.edge_count = 0;
    }

    /// Converts to the dense form.
    ///
    /// Starts from [`WEIGHT_INFINITY`] off the diagonal and `0` on it, then
    /// writes every edge's weight into its cell in list order. With duplicate
    /// edges the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if the matrix cannot be allocated.
    pub fn to_matrix(&self) -> Result<AdjacencyMatrix, Error> {
        let n = self.vertices.len();
        let mut matrix = AdjacencyMatrix::new(n)?;
        for (source, list) in self.vertices.iter().enumerate() {
            for edge in list.iter(&self.storage) {
                matrix.cells[source * n + edge.target] = edge.weight;
            }
        }

        tracing::debug!(vertices = n, edges = self.edge_count, "graph converted to matrix");
        Ok(matrix)
    }

    // ========================================================================
    // Breadth-First Search
    // ========================================================================

    /// Walks outward from `source`, recording `(distance, predecessor)` for
    /// every reachable vertex.
    fn search(&self, source: usize) -> Result<Vec<Option<(usize, usize)>>, Error> {
        self.check(source)?;
        let n = self.vertices.len();

        let mut seen = Vec::new();
        seen.try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailure)?;
        seen.resize(n, None);

        // Each vertex is queued at most once.
        let mut frontier = RingQueue::with_capacity(n)?;
        seen[source] = Some((0, source));
        frontier.push(source).map_err(|_| Error::Overflow)?;

        while let Ok(vertex) = frontier.pop() {
            let Some((distance, _)) = seen[vertex] else {
                continue;
            };
            for edge in self.vertices[vertex].iter(&self.storage) {
                if seen[edge.target].is_none() {
                    seen[edge.target] = Some((distance + 1, vertex));
                    frontier.push(edge.target).map_err(|_| Error::Overflow)?;
                }
            }
        }
        Ok(seen)
    }

    /// Returns the edge-count distance from `source` to every vertex, or
    /// `None` for vertices it cannot reach. Weights are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `source` is out of range
    /// - [`Error::AllocationFailure`] if scratch space cannot be allocated
    pub fn bfs(&self, source: usize) -> Result<Vec<Option<usize>>, Error> {
        Ok(self
            .search(source)?
            .into_iter()
            .map(|entry| entry.map(|(distance, _)| distance))
            .collect())
    }

    /// Returns a path with the fewest edges from `source` to `target`, both
    /// ends included, or `None` if `target` is unreachable.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either vertex is out of range
    /// - [`Error::AllocationFailure`] if scratch space cannot be allocated
    pub fn shortest_path(&self, source: usize, target: usize) -> Result<Option<Vec<usize>>, Error> {
        self.check(target)?;
        let seen = self.search(source)?;
        let Some((distance, _)) = seen[target] else {
            return Ok(None);
        };

        let mut path = Vec::new();
        path.try_reserve_exact(distance + 1)
            .map_err(|_| Error::AllocationFailure)?;
        let mut vertex = target;
        path.push(vertex);
        while vertex != source {
            match seen[vertex] {
                Some((_, prev)) => vertex = prev,
                None => return Ok(None),
            }
            path.push(vertex);
        }
        path.reverse();
        Ok(Some(path))
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edge_count)
            .finish()
    }
}

// ============================================================================
// Adjacency Matrix
// ============================================================================

/// A dense `n x n` weight matrix, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    order: usize,
    cells: Vec<i32>,
}

impl AdjacencyMatrix {
    /// Creates a matrix with no edges: [`WEIGHT_INFINITY`] everywhere except
    /// `0` on the diagonal.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `n` is zero
    /// - [`Error::AllocationFailure`] if `n * n` cells cannot be allocated
    pub fn new(n: usize) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("matrix order must be > 0"));
        }
        let len = n.checked_mul(n).ok_or(Error::AllocationFailure)?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure)?;
        cells.resize(len, WEIGHT_INFINITY);
        for i in 0..n {
            cells[i * n + i] = 0;
        }

        Ok(Self { order: n, cells })
    }

    /// Returns `n`, the number of rows and columns.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize, Error> {
        if row < self.order && col < self.order {
            Ok(row * self.order + col)
        } else {
            Err(Error::InvalidArgument("matrix index out of range"))
        }
    }

    /// Returns the weight at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the cell is out of range.
    pub fn get(&self, row: usize, col: usize) -> Result<i32, Error> {
        Ok(self.cells[self.index(row, col)?])
    }

    /// Sets the weight at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the cell is out of range.
    pub fn set(&mut self, row: usize, col: usize, weight: i32) -> Result<(), Error> {
        let i = self.index(row, col)?;
        self.cells[i] = weight;
        Ok(())
    }

    /// Returns one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `row` is out of range.
    pub fn row(&self, row: usize) -> Result<&[i32], Error> {
        let start = self.index(row, 0)?;
        Ok(&self.cells[start..start + self.order])
    }
}

impl std::fmt::Debug for AdjacencyMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.cells.chunks_exact(self.order)).finish()
    }
}
