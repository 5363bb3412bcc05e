use nalgebra::Point3;

/// A charged point particle.
///
/// Atoms are identified by their index in the owning [`Molecule`](super::molecule::Molecule);
/// they carry no identity of their own. Positions are in Angstroms and charges in
/// elementary charge units, matching the default Coulomb constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// Cartesian position of the atom.
    pub position: Point3<f64>,
    /// Partial charge of the atom.
    pub charge: f64,
}

impl Atom {
    /// Creates a new atom at the given position with the given charge.
    pub fn new(position: Point3<f64>, charge: f64) -> Self {
        Self { position, charge }
    }

    /// Euclidean distance between two atoms.
    #[inline]
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_stores_position_and_charge() {
        let atom = Atom::new(Point3::new(1.0, 2.0, 3.0), -0.5);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.charge, -0.5);
    }

    #[test]
    fn distance_to_is_euclidean() {
        let a = Atom::new(Point3::new(0.0, 0.0, 0.0), 1.0);
        let b = Atom::new(Point3::new(3.0, 4.0, 0.0), 1.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }
}
