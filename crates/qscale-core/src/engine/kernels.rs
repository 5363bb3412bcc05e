//! Work-item bodies of the `bfs` and `coulomb` kernels.
//!
//! These functions only see raw buffers, never [`BondGraph`](crate::core::models::graph::BondGraph)
//! or [`ScaleMatrix`](crate::core::forcefield::scale_matrix::ScaleMatrix). A
//! device decides how to schedule them.

use crate::core::forcefield::params::ScalingScheme;
use crate::core::forcefield::potentials::scaled_coulomb;
use crate::core::forcefield::scale_matrix::fill_scale_row_from_table;
use nalgebra::Point3;

/// `bfs` work item for atom `source`.
///
/// Reads the fixed-stride `edges` table (stride `degree.len()`) and writes one
/// scale row. `queue` is this work item's private row of the scratch buffer.
#[inline]
pub fn bfs(
    source: usize,
    edges: &[usize],
    degree: &[usize],
    scheme: &ScalingScheme,
    queue: &mut [usize],
    scale: &mut [f64],
) {
    fill_scale_row_from_table(edges, degree, source, scheme, queue, scale);
}

/// Read-only inputs of the `coulomb` kernel, shared by every work group.
#[derive(Clone, Copy)]
pub struct Tile<'a> {
    pub charges: &'a [f64],
    pub positions: &'a [Point3<f64>],
    pub scale: &'a [f64],
    pub coulomb_constant: f64,
    pub group_size: usize,
}

impl Tile<'_> {
    /// Energy term of work item `(i, j)`.
    ///
    /// Only pairs with `i < j` contribute; every other work item, including the
    /// padding past the last atom, yields `0.0`. This keeps each unordered pair
    /// counted exactly once, like the reference double loop.
    #[inline]
    pub fn pair_term(&self, i: usize, j: usize) -> f64 {
        let n = self.charges.len();
        if i >= j || j >= n {
            return 0.0;
        }
        let dist = nalgebra::distance(&self.positions[i], &self.positions[j]);
        scaled_coulomb(
            dist,
            self.charges[i],
            self.charges[j],
            self.scale[i * n + j],
            self.coulomb_constant,
        )
    }

    /// Computes and reduces the tile at group coordinates `(group_x, group_y)`.
    ///
    /// Work item `(lx, ly)` handles atom pair `(group_x·G + lx, group_y·G + ly)`
    /// and stores its term in `local`, which must hold `G²` values. The group
    /// then folds `local` with a pairwise tree reduction.
    pub fn reduce_group(&self, group_x: usize, group_y: usize, local: &mut [f64]) -> f64 {
        let g = self.group_size;
        // No pair with i < j can fall in a tile strictly below the diagonal.
        if group_y < group_x {
            return 0.0;
        }
        let local = &mut local[..g * g];
        for ly in 0..g {
            for lx in 0..g {
                local[ly * g + lx] = self.pair_term(group_x * g + lx, group_y * g + ly);
            }
        }
        tree_reduce(local)
    }
}

/// Sums `values` by repeatedly folding the upper half onto the lower half.
///
/// The buffer is overwritten. An empty slice sums to `0.0`.
pub fn tree_reduce(values: &mut [f64]) -> f64 {
    let mut len = values.len();
    if len == 0 {
        return 0.0;
    }
    while len > 1 {
        let half = len.div_ceil(2);
        for k in 0..len / 2 {
            values[k] += values[k + half];
        }
        len = half;
    }
    values[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::scale_matrix::ScaleMatrix;
    use crate::core::models::graph::BondGraph;

    #[test]
    fn tree_reduce_handles_odd_lengths() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(tree_reduce(&mut values), 15.0);
        let mut single = vec![7.5];
        assert_eq!(tree_reduce(&mut single), 7.5);
        assert_eq!(tree_reduce(&mut []), 0.0);
    }

    #[test]
    fn bfs_work_item_matches_host_row() {
        let graph =
            BondGraph::from_bonds(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let scheme = ScalingScheme::default();
        let host = ScaleMatrix::build(&graph, &scheme);
        let mut queue = vec![0; 6];
        let mut row = vec![0.0; 6];
        for source in 0..6 {
            bfs(
                source,
                graph.edges(),
                graph.degrees(),
                &scheme,
                &mut queue,
                &mut row,
            );
            assert_eq!(row, host.row(source));
        }
    }

    #[test]
    fn pair_term_skips_diagonal_lower_triangle_and_padding() {
        let charges = [1.0, 1.0];
        let positions = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        let scale = [0.0, 1.0, 1.0, 0.0];
        let tile = Tile {
            charges: &charges,
            positions: &positions,
            scale: &scale,
            coulomb_constant: 1.0,
            group_size: 4,
        };
        assert_eq!(tile.pair_term(0, 0), 0.0);
        assert_eq!(tile.pair_term(1, 0), 0.0);
        assert_eq!(tile.pair_term(0, 3), 0.0);
        assert_eq!(tile.pair_term(0, 1), 0.5);
    }

    #[test]
    fn tiles_below_the_diagonal_contribute_nothing() {
        let charges = vec![1.0; 4];
        let positions: Vec<_> = (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let scale = vec![1.0; 16];
        let tile = Tile {
            charges: &charges,
            positions: &positions,
            scale: &scale,
            coulomb_constant: 1.0,
            group_size: 2,
        };
        let mut local = vec![0.0; 4];
        assert_eq!(tile.reduce_group(1, 0, &mut local), 0.0);
        // Group (0, 1) covers i in {0, 1}, j in {2, 3}.
        let expected = 1.0 / 2.0 + 1.0 / 3.0 + 1.0 + 1.0 / 2.0;
        assert!((tile.reduce_group(0, 1, &mut local) - expected).abs() < 1e-12);
    }
}
