use super::config::EnergyConfig;
use super::state::StageTimings;
use crate::core::forcefield::potentials::scaled_coulomb;
use crate::core::forcefield::scale_matrix::ScaleMatrix;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Result of the sequential host-side computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRun {
    pub energy: f64,
    pub scale: ScaleMatrix,
    pub timings: StageTimings,
}

/// Sums the scaled Coulomb energy over every unordered pair `i < j`.
///
/// Pairs are visited in row-major order, so the result is bit-for-bit
/// reproducible for a given input.
pub fn pair_energy(molecule: &Molecule, scale: &ScaleMatrix, coulomb_constant: f64) -> f64 {
    let atoms: Vec<Atom> = molecule.atoms().collect();

    let mut total = 0.0;
    for (i, a) in atoms.iter().enumerate() {
        let row = scale.row(i);
        for (j, b) in atoms.iter().enumerate().skip(i + 1) {
            let dist = a.distance_to(b);
            total += scaled_coulomb(dist, a.charge, b.charge, row[j], coulomb_constant);
        }
    }
    total
}

/// Builds the scale matrix on the host and runs the sequential accumulator.
#[instrument(skip_all, name = "reference_energy")]
pub fn run(molecule: &Molecule, config: &EnergyConfig) -> ReferenceRun {
    info!(atoms = molecule.atom_count(), "Starting reference computation.");

    let start = Instant::now();
    let scale = ScaleMatrix::build(molecule.bonds(), &config.scaling);
    let prepare = start.elapsed();
    debug!(elapsed = ?prepare, "Scale matrix built.");

    let start = Instant::now();
    let energy = pair_energy(molecule, &scale, config.coulomb_constant);
    let execute = start.elapsed();

    info!(energy, "Reference computation finished.");
    ReferenceRun {
        energy,
        scale,
        timings: StageTimings { prepare, execute },
    }
}
