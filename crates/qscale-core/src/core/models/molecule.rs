use super::atom::Atom;
use super::graph::BondGraph;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Got {positions} positions but {charges} charges")]
    ChargeCountMismatch { positions: usize, charges: usize },
    #[error("Bond graph covers {graph} atoms but the molecule has {atoms}")]
    GraphSizeMismatch { atoms: usize, graph: usize },
}

/// A finite, non-periodic set of charged atoms together with their bond graph.
///
/// Positions and charges are stored as separate arrays because that is how the
/// energy kernels bind them. The molecule is immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    positions: Vec<Point3<f64>>,
    charges: Vec<f64>,
    bonds: BondGraph,
}

impl Molecule {
    /// Creates a molecule from parallel position and charge arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the arrays or the bond graph disagree on the atom count.
    pub fn new(
        positions: Vec<Point3<f64>>,
        charges: Vec<f64>,
        bonds: BondGraph,
    ) -> Result<Self, ModelError> {
        if positions.len() != charges.len() {
            return Err(ModelError::ChargeCountMismatch {
                positions: positions.len(),
                charges: charges.len(),
            });
        }
        if bonds.atom_count() != positions.len() {
            return Err(ModelError::GraphSizeMismatch {
                atoms: positions.len(),
                graph: bonds.atom_count(),
            });
        }
        Ok(Self {
            positions,
            charges,
            bonds,
        })
    }

    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    pub fn bonds(&self) -> &BondGraph {
        &self.bonds
    }

    /// Iterates the atoms as position/charge values, in index order.
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.positions
            .iter()
            .zip(&self.charges)
            .map(|(&position, &charge)| Atom::new(position, charge))
    }

    /// Sum of all partial charges.
    pub fn net_charge(&self) -> f64 {
        self.charges.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_atom_molecule(bonds: BondGraph) -> Result<Molecule, ModelError> {
        Molecule::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            vec![1.0, -0.25],
            bonds,
        )
    }

    #[test]
    fn atoms_pair_positions_with_charges() {
        let molecule = two_atom_molecule(BondGraph::empty(2)).unwrap();
        assert_eq!(molecule.atom_count(), 2);
        let atoms: Vec<_> = molecule.atoms().collect();
        assert_eq!(
            atoms,
            vec![
                Atom::new(Point3::new(0.0, 0.0, 0.0), 1.0),
                Atom::new(Point3::new(1.0, 0.0, 0.0), -0.25),
            ]
        );
    }

    #[test]
    fn new_rejects_mismatched_charge_count() {
        let result = Molecule::new(vec![Point3::origin(); 2], vec![1.0], BondGraph::empty(2));
        assert_eq!(
            result,
            Err(ModelError::ChargeCountMismatch {
                positions: 2,
                charges: 1
            })
        );
    }

    #[test]
    fn new_rejects_graph_of_wrong_size() {
        let result = two_atom_molecule(BondGraph::empty(3));
        assert_eq!(
            result,
            Err(ModelError::GraphSizeMismatch { atoms: 2, graph: 3 })
        );
    }

    #[test]
    fn net_charge_sums_all_charges() {
        let molecule = two_atom_molecule(BondGraph::empty(2)).unwrap();
        assert!((molecule.net_charge() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn default_molecule_is_empty() {
        let molecule = Molecule::default();
        assert!(molecule.is_empty());
        assert_eq!(molecule.bonds().atom_count(), 0);
    }
}
