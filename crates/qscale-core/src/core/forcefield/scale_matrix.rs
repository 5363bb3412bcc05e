use super::params::ScalingScheme;
use crate::core::models::graph::BondGraph;

/// Fills one row of the scale matrix with a bounded-depth breadth-first search.
///
/// `row[j]` becomes the scale for the pair `(source, j)`. `queue` is scratch space
/// of at least `atom_count` entries; every atom enters it at most once, so it
/// never overflows.
///
/// # Panics
///
/// Panics if `row` or `queue` is shorter than the atom count, or if the graph
/// contains a neighbor index outside `0..atom_count`.
pub fn fill_scale_row(
    graph: &BondGraph,
    source: usize,
    scheme: &ScalingScheme,
    queue: &mut [usize],
    row: &mut [f64],
) {
    fill_scale_row_from_table(graph.edges(), graph.degrees(), source, scheme, queue, row);
}

/// Same search as [`fill_scale_row`], reading the fixed-stride neighbor table
/// directly (stride `degree.len()`).
///
/// Round `k` assigns `scheme.scale_at(Some(k))` to every atom first reached in
/// that round. Visited atoms are tracked with an explicit mask, never by
/// comparing the row against the default scale, so a depth scale equal to the
/// default still closes its shell.
pub fn fill_scale_row_from_table(
    edges: &[usize],
    degree: &[usize],
    source: usize,
    scheme: &ScalingScheme,
    queue: &mut [usize],
    row: &mut [f64],
) {
    let n = degree.len();
    let row = &mut row[..n];
    row.fill(scheme.scale_at(None));

    let mut visited = vec![false; n];
    visited[source] = true;
    row[source] = scheme.scale_at(Some(0));

    queue[0] = source;
    let mut head = 0;
    let mut tail = 1;

    for depth in 1..=scheme.depth() {
        let frontier_end = tail;
        if head == frontier_end {
            break;
        }
        let scale = scheme.scale_at(Some(depth));
        while head < frontier_end {
            let vertex = queue[head];
            head += 1;
            let start = vertex * n;
            for &neighbor in &edges[start..start + degree[vertex]] {
                if visited[neighbor] {
                    continue;
                }
                visited[neighbor] = true;
                row[neighbor] = scale;
                queue[tail] = neighbor;
                tail += 1;
            }
        }
    }
}

/// Dense `N × N` matrix of per-pair interaction scale factors, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleMatrix {
    atom_count: usize,
    data: Vec<f64>,
}

impl ScaleMatrix {
    /// Builds the matrix by running one bounded search per atom, in index order.
    pub fn build(graph: &BondGraph, scheme: &ScalingScheme) -> Self {
        let n = graph.atom_count();
        let mut data = vec![scheme.default_scale; n * n];
        let mut queue = vec![0usize; n];
        for (source, row) in data.chunks_mut(n.max(1)).enumerate().take(n) {
            fill_scale_row(graph, source, scheme, &mut queue, row);
        }
        Self {
            atom_count: n,
            data,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.atom_count + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.atom_count;
        &self.data[start..start + self.atom_count]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.atom_count;
        (0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> BondGraph {
        let bonds: Vec<_> = (0..n - 1).map(|i| (i, i + 1)).collect();
        BondGraph::from_bonds(n, &bonds).unwrap()
    }

    fn ring(n: usize) -> BondGraph {
        let bonds: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        BondGraph::from_bonds(n, &bonds).unwrap()
    }

    #[test]
    fn path_graph_assigns_scales_by_distance() {
        let matrix = ScaleMatrix::build(&path(5), &ScalingScheme::default());
        assert_eq!(matrix.row(0), &[0.0, 0.0, 0.0, 0.5, 1.0]);
        assert_eq!(matrix.row(2), &[0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(matrix.row(4), &[1.0, 0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn diagonal_is_always_zero() {
        let matrix = ScaleMatrix::build(&ring(7), &ScalingScheme::default());
        assert!((0..7).all(|i| matrix.get(i, i) == 0.0));
    }

    #[test]
    fn builds_symmetric_matrix_for_ring() {
        let matrix = ScaleMatrix::build(&ring(9), &ScalingScheme::default());
        assert!(matrix.is_symmetric());
        assert_eq!(matrix.get(0, 3), 0.5);
        assert_eq!(matrix.get(0, 6), 0.5);
        assert_eq!(matrix.get(0, 4), 1.0);
    }

    #[test]
    fn shortest_route_wins_in_a_small_ring() {
        // In a 4-ring every atom is within two bonds of every other atom.
        let matrix = ScaleMatrix::build(&ring(4), &ScalingScheme::default());
        assert!(matrix.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn isolated_atom_keeps_default_scale() {
        let graph = BondGraph::from_bonds(4, &[(0, 1), (1, 2)]).unwrap();
        let matrix = ScaleMatrix::build(&graph, &ScalingScheme::default());
        assert_eq!(matrix.row(3), &[1.0, 1.0, 1.0, 0.0]);
        assert_eq!(matrix.get(0, 3), 1.0);
    }

    #[test]
    fn disconnected_fragments_interact_fully() {
        let graph = BondGraph::from_bonds(4, &[(0, 1), (2, 3)]).unwrap();
        let matrix = ScaleMatrix::build(&graph, &ScalingScheme::default());
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(0, 2), 1.0);
        assert_eq!(matrix.get(1, 3), 1.0);
    }

    #[test]
    fn branched_graph_scales_every_shell() {
        // 0 is the hub of a star; 4 hangs off 1.
        let graph = BondGraph::from_bonds(6, &[(0, 1), (0, 2), (0, 3), (1, 4), (4, 5)]).unwrap();
        let matrix = ScaleMatrix::build(&graph, &ScalingScheme::default());
        assert_eq!(matrix.get(2, 3), 0.0);
        assert_eq!(matrix.get(2, 4), 0.5);
        assert_eq!(matrix.get(2, 5), 1.0);
        assert_eq!(matrix.get(0, 5), 0.5);
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let graph = ring(11);
        let scheme = ScalingScheme::default();
        assert_eq!(
            ScaleMatrix::build(&graph, &scheme),
            ScaleMatrix::build(&graph, &scheme)
        );
    }

    #[test]
    fn custom_scheme_controls_depth() {
        let scheme = ScalingScheme::new(vec![0.0, 0.3, 0.6, 0.8], 1.0);
        let matrix = ScaleMatrix::build(&path(6), &scheme);
        assert_eq!(matrix.row(0), &[0.0, 0.0, 0.3, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn scale_equal_to_default_does_not_reopen_visited_atoms() {
        // Triangle 0-1-2 with a tail 2-3. Atom 2 sits in the first shell of 0 and
        // must not be reassigned when it is reached again from 1.
        let graph = BondGraph::from_bonds(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        let scheme = ScalingScheme::new(vec![1.0, 0.0], 1.0);
        let matrix = ScaleMatrix::build(&graph, &scheme);
        assert_eq!(matrix.row(0), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_depth_scheme_only_clears_diagonal() {
        let scheme = ScalingScheme::new(vec![], 1.0);
        let matrix = ScaleMatrix::build(&path(3), &scheme);
        assert_eq!(matrix.row(1), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_graph_builds_empty_matrix() {
        let matrix = ScaleMatrix::build(&BondGraph::empty(0), &ScalingScheme::default());
        assert_eq!(matrix.atom_count(), 0);
        assert!(matrix.as_slice().is_empty());
    }

    #[test]
    fn fill_scale_row_overwrites_stale_row_contents() {
        let graph = path(3);
        let mut queue = vec![0; 3];
        let mut row = vec![42.0; 3];
        fill_scale_row(&graph, 2, &ScalingScheme::default(), &mut queue, &mut row);
        assert_eq!(row, vec![0.0, 0.0, 0.0]);
    }
}
