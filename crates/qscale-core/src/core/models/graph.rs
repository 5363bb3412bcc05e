use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Edge table has {actual} entries, expected {expected} for {atoms} atoms")]
    TableShape {
        atoms: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Atom {atom} declares degree {degree}, which exceeds the row stride {stride}")]
    DegreeOverflow {
        atom: usize,
        degree: usize,
        stride: usize,
    },
    #[error("Bond ({0}, {1}) references an atom outside 0..{2}")]
    IndexOutOfRange(usize, usize, usize),
    #[error("Bond ({0}, {0}) is a self-loop")]
    SelfLoop(usize),
    #[error("Adjacency matrix is not symmetric at ({i}, {j})")]
    Asymmetric { i: usize, j: usize },
    #[error("Adjacency matrix row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Undirected bond connectivity in a compact fixed-stride layout.
///
/// Row `i` of `edges` starts at `i * atom_count` and only its first `degree[i]`
/// entries are meaningful. The table is therefore `atom_count²` long, which is
/// exactly the layout the `bfs` kernel consumes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BondGraph {
    edges: Vec<usize>,
    degree: Vec<usize>,
}

impl BondGraph {
    /// Creates a graph with `atom_count` atoms and no bonds.
    pub fn empty(atom_count: usize) -> Self {
        Self {
            edges: vec![0; atom_count * atom_count],
            degree: vec![0; atom_count],
        }
    }

    /// Wraps an already encoded neighbor table.
    ///
    /// Only the table shape is checked. Neighbor indices and the undirected
    /// invariant are the caller's responsibility.
    pub fn from_raw_parts(edges: Vec<usize>, degree: Vec<usize>) -> Result<Self, GraphError> {
        let n = degree.len();
        if edges.len() != n * n {
            return Err(GraphError::TableShape {
                atoms: n,
                expected: n * n,
                actual: edges.len(),
            });
        }
        if let Some((atom, &d)) = degree.iter().enumerate().find(|&(_, &d)| d > n) {
            return Err(GraphError::DegreeOverflow {
                atom,
                degree: d,
                stride: n,
            });
        }
        Ok(Self { edges, degree })
    }

    /// Builds an undirected graph from a list of bonded index pairs.
    ///
    /// Each pair is inserted in both directions; repeated bonds are ignored.
    /// Neighbor order follows first appearance in `bonds`.
    pub fn from_bonds(atom_count: usize, bonds: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self::empty(atom_count);
        for &(a, b) in bonds {
            if a >= atom_count || b >= atom_count {
                return Err(GraphError::IndexOutOfRange(a, b, atom_count));
            }
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            graph.push_neighbor(a, b);
            graph.push_neighbor(b, a);
        }
        Ok(graph)
    }

    /// Converts a dense boolean adjacency matrix into the fixed-stride layout.
    ///
    /// Entries are read row by row, so neighbors come out in ascending index
    /// order. The matrix is not symmetrized; an asymmetric input produces a
    /// directed graph, which [`BondGraph::is_undirected`] reports.
    pub fn from_adjacency_matrix(matrix: &[Vec<bool>]) -> Result<Self, GraphError> {
        let n = matrix.len();
        let mut graph = Self::empty(n);
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NotSquare {
                    row: i,
                    len: row.len(),
                    expected: n,
                });
            }
            for (j, &bonded) in row.iter().enumerate() {
                if bonded {
                    graph.edges[i * n + graph.degree[i]] = j;
                    graph.degree[i] += 1;
                }
            }
        }
        Ok(graph)
    }

    fn push_neighbor(&mut self, from: usize, to: usize) {
        if self.neighbors(from).contains(&to) {
            return;
        }
        let n = self.atom_count();
        self.edges[from * n + self.degree[from]] = to;
        self.degree[from] += 1;
    }

    pub fn atom_count(&self) -> usize {
        self.degree.len()
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.degree[atom]
    }

    /// Meaningful neighbors of `atom`, in table order.
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        let start = atom * self.atom_count();
        &self.edges[start..start + self.degree[atom]]
    }

    /// The raw fixed-stride edge table.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    /// The raw per-atom degree array.
    pub fn degrees(&self) -> &[usize] {
        &self.degree
    }

    pub fn bond_count(&self) -> usize {
        self.degree.iter().sum::<usize>() / 2
    }

    /// Checks that every neighbor relation has its reverse.
    pub fn is_undirected(&self) -> bool {
        (0..self.atom_count()).all(|i| {
            self.neighbors(i)
                .iter()
                .all(|&j| j < self.atom_count() && self.neighbors(j).contains(&i))
        })
    }
}
