use super::config::EnergyConfig;
use super::device::{BfsArgs, ComputeDevice, CoulombArgs, DeviceError, groups_per_axis};
use super::progress::{Progress, ProgressReporter, Stage};
use super::state::StageTimings;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Buffers owned by one device computation.
///
/// Inputs are copied out of the molecule so the computation never shares
/// memory with another device's run.
#[derive(Debug, Clone)]
pub struct DeviceBuffers {
    edges: Vec<usize>,
    degree: Vec<usize>,
    queue: Vec<usize>,
    positions: Vec<Point3<f64>>,
    charges: Vec<f64>,
    scale: Vec<f64>,
    partial_energy: Vec<f64>,
}

impl DeviceBuffers {
    pub fn prepare(molecule: &Molecule, config: &EnergyConfig) -> Self {
        let n = molecule.atom_count();
        let groups = groups_per_axis(n, config.group_size);
        Self {
            edges: molecule.bonds().edges().to_vec(),
            degree: molecule.bonds().degrees().to_vec(),
            queue: vec![0; n * n],
            positions: molecule.positions().to_vec(),
            charges: molecule.charges().to_vec(),
            scale: vec![config.scaling.default_scale; n * n],
            partial_energy: vec![0.0; groups * groups],
        }
    }

    /// Binds the `bfs` arguments in kernel order.
    pub fn bfs_args(&mut self) -> BfsArgs<'_> {
        BfsArgs {
            edges: &self.edges,
            degree: &self.degree,
            queue: &mut self.queue,
            scale: &mut self.scale,
        }
    }

    /// Binds the `coulomb` arguments in kernel order.
    pub fn coulomb_args(&mut self) -> CoulombArgs<'_> {
        CoulombArgs {
            charges: &self.charges,
            positions: &self.positions,
            scale: &self.scale,
            partial_energy: &mut self.partial_energy,
        }
    }

    /// Host-side final sum of the per-group partial energies, in group order.
    pub fn read_total_energy(&self) -> f64 {
        self.partial_energy.iter().sum()
    }
}

/// A finished computation on one device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceRun {
    pub energy: f64,
    pub timings: StageTimings,
}

/// Runs the full two-stage energy computation on `device`.
///
/// The `coulomb` stage starts only after the `bfs` launch has returned, which
/// is the barrier between writing and reading the scale matrix.
#[instrument(skip_all, name = "device_energy", fields(device = %device.name()))]
pub fn run_on_device(
    device: &dyn ComputeDevice,
    molecule: &Molecule,
    config: &EnergyConfig,
    reporter: &ProgressReporter,
) -> Result<DeviceRun, DeviceError> {
    info!(atoms = molecule.atom_count(), "Starting device computation.");

    reporter.report(Progress::StageStart(Stage::PrepareBuffers));
    let start = Instant::now();
    let mut buffers = DeviceBuffers::prepare(molecule, config);
    let prepare = start.elapsed();
    debug!(elapsed = ?prepare, "Buffers prepared.");

    let start = Instant::now();
    reporter.report(Progress::StageStart(Stage::Bfs));
    device.launch_bfs(buffers.bfs_args(), &config.scaling)?;

    reporter.report(Progress::StageStart(Stage::Coulomb));
    device.launch_coulomb(
        buffers.coulomb_args(),
        config.coulomb_constant,
        config.group_size,
    )?;

    reporter.report(Progress::StageStart(Stage::Readback));
    let energy = buffers.read_total_energy();
    let execute = start.elapsed();
    debug!(elapsed = ?execute, "Kernels executed.");

    info!(energy, "Device computation finished.");
    Ok(DeviceRun {
        energy,
        timings: StageTimings { prepare, execute },
    })
}
