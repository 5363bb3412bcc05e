//! Compute devices and the kernel argument contract.
//!
//! A device runs the two named kernels, `bfs` and `coulomb`, over buffers the
//! host prepares. Arguments are bound in a fixed order, mirrored by the field
//! order of [`BfsArgs`] and [`CoulombArgs`]:
//!
//! - `bfs(edges, degree, queue, scale)`
//! - `coulomb(charges, positions, scale, partial_energy)`
//!
//! [`CpuDevice`] executes both kernels on a dedicated rayon thread pool.

use super::error::EngineError;
use super::kernels;
use crate::core::forcefield::params::ScalingScheme;
use nalgebra::Point3;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A diagnostic raised by a device, with a numeric code and a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("device error {code}: {message}")]
pub struct DeviceError {
    pub code: i32,
    pub message: String,
}

impl DeviceError {
    pub const OUT_OF_RESOURCES: i32 = -5;
    pub const EXECUTION_FAILURE: i32 = -14;
    pub const INVALID_KERNEL_NAME: i32 = -46;
    pub const INVALID_ARG_SIZE: i32 = -51;
    pub const INVALID_WORK_GROUP_SIZE: i32 = -54;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn arg_size(kernel: KernelName, arg: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            Self::INVALID_ARG_SIZE,
            format!(
                "{}: argument '{}' has {} elements, expected {}",
                kernel, arg, actual, expected
            ),
        )
    }

    fn from_panic(kernel: KernelName, payload: Box<dyn Any + Send>) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::new(
            Self::EXECUTION_FAILURE,
            format!("{}: work item aborted: {}", kernel, detail),
        )
    }
}

/// Runs a kernel body, turning a panicking work item into a [`DeviceError`].
fn guarded<F: FnOnce()>(kernel: KernelName, body: F) -> Result<(), DeviceError> {
    panic::catch_unwind(AssertUnwindSafe(body)).map_err(|p| DeviceError::from_panic(kernel, p))
}

/// Entry points of the kernel program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelName {
    Bfs,
    Coulomb,
}

impl KernelName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Coulomb => "coulomb",
        }
    }
}

impl fmt::Display for KernelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelName {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bfs" => Ok(Self::Bfs),
            "coulomb" => Ok(Self::Coulomb),
            other => Err(DeviceError::new(
                DeviceError::INVALID_KERNEL_NAME,
                format!("no kernel named '{}' in program", other),
            )),
        }
    }
}

/// Bound arguments of the `bfs` kernel.
///
/// `edges`, `queue` and `scale` are `N × N` row-major buffers; `degree` has `N`
/// entries. Work item `v` owns row `v` of `queue` and `scale`.
pub struct BfsArgs<'a> {
    pub edges: &'a [usize],
    pub degree: &'a [usize],
    pub queue: &'a mut [usize],
    pub scale: &'a mut [f64],
}

/// Bound arguments of the `coulomb` kernel.
///
/// `partial_energy` holds one value per work group, `ceil(N/G)²` in total,
/// indexed `group_y * groups + group_x`.
pub struct CoulombArgs<'a> {
    pub charges: &'a [f64],
    pub positions: &'a [Point3<f64>],
    pub scale: &'a [f64],
    pub partial_energy: &'a mut [f64],
}

/// Number of work groups along one axis of the pair space.
#[inline]
pub fn groups_per_axis(atom_count: usize, group_size: usize) -> usize {
    atom_count.div_ceil(group_size)
}

/// A data-parallel device able to run the `bfs` and `coulomb` kernels.
///
/// Each launch blocks until every work item has finished, so a returned launch
/// is a completion barrier for everything it wrote.
pub trait ComputeDevice: Send + Sync {
    fn name(&self) -> &str;

    /// Runs one `bfs` work item per atom.
    fn launch_bfs(&self, args: BfsArgs<'_>, scheme: &ScalingScheme) -> Result<(), DeviceError>;

    /// Runs the tiled `coulomb` reduction, one work group per `group_size²` tile.
    fn launch_coulomb(
        &self,
        args: CoulombArgs<'_>,
        coulomb_constant: f64,
        group_size: usize,
    ) -> Result<(), DeviceError>;
}

/// A CPU device backed by its own rayon thread pool.
///
/// Like a hardware device, it caps the number of work items in one work
/// group at [`CpuDevice::MAX_WORK_GROUP_ITEMS`]; each group keeps that many
/// partial terms in scratch memory.
pub struct CpuDevice {
    name: String,
    pool: ThreadPool,
}

impl CpuDevice {
    /// Largest `G²` a `coulomb` launch may request.
    pub const MAX_WORK_GROUP_ITEMS: usize = 1024;

    /// Creates a device with `threads` workers; `0` uses every logical core.
    pub fn new(threads: usize) -> Result<Self, DeviceError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("qscale-cpu-{}", i))
            .build()
            .map_err(|e| {
                DeviceError::new(
                    DeviceError::OUT_OF_RESOURCES,
                    format!("failed to start thread pool: {}", e),
                )
            })?;
        let threads = pool.current_num_threads();
        let name = format!(
            "CPU (rayon, {} {})",
            threads,
            if threads == 1 { "thread" } else { "threads" }
        );
        Ok(Self { name, pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl fmt::Debug for CpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuDevice")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ComputeDevice for CpuDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn launch_bfs(&self, args: BfsArgs<'_>, scheme: &ScalingScheme) -> Result<(), DeviceError> {
        let BfsArgs {
            edges,
            degree,
            queue,
            scale,
        } = args;
        let n = degree.len();
        let kernel = KernelName::Bfs;
        if edges.len() != n * n {
            return Err(DeviceError::arg_size(kernel, "edges", n * n, edges.len()));
        }
        if queue.len() != n * n {
            return Err(DeviceError::arg_size(kernel, "queue", n * n, queue.len()));
        }
        if scale.len() != n * n {
            return Err(DeviceError::arg_size(kernel, "scale", n * n, scale.len()));
        }
        if n == 0 {
            return Ok(());
        }

        debug!(device = %self.name, work_items = n, "Launching bfs kernel.");
        guarded(kernel, || {
            self.pool.install(|| {
                scale
                    .par_chunks_mut(n)
                    .zip(queue.par_chunks_mut(n))
                    .enumerate()
                    .for_each(|(source, (scale_row, queue_row))| {
                        kernels::bfs(source, edges, degree, scheme, queue_row, scale_row);
                    });
            })
        })
    }

    fn launch_coulomb(
        &self,
        args: CoulombArgs<'_>,
        coulomb_constant: f64,
        group_size: usize,
    ) -> Result<(), DeviceError> {
        let CoulombArgs {
            charges,
            positions,
            scale,
            partial_energy,
        } = args;
        let n = charges.len();
        let kernel = KernelName::Coulomb;
        if group_size == 0 {
            return Err(DeviceError::new(
                DeviceError::INVALID_WORK_GROUP_SIZE,
                "coulomb: work group size must be at least 1",
            ));
        }
        let group_items = group_size
            .checked_mul(group_size)
            .filter(|&items| items <= Self::MAX_WORK_GROUP_ITEMS)
            .ok_or_else(|| {
                DeviceError::new(
                    DeviceError::INVALID_WORK_GROUP_SIZE,
                    format!(
                        "coulomb: work group of {}x{} items exceeds the device limit of {}",
                        group_size,
                        group_size,
                        Self::MAX_WORK_GROUP_ITEMS
                    ),
                )
            })?;
        if positions.len() != n {
            return Err(DeviceError::arg_size(kernel, "positions", n, positions.len()));
        }
        if scale.len() != n * n {
            return Err(DeviceError::arg_size(kernel, "scale", n * n, scale.len()));
        }
        let groups = groups_per_axis(n, group_size);
        if partial_energy.len() != groups * groups {
            return Err(DeviceError::arg_size(
                kernel,
                "partial_energy",
                groups * groups,
                partial_energy.len(),
            ));
        }

        debug!(
            device = %self.name,
            groups = groups * groups,
            group_size,
            "Launching coulomb kernel."
        );
        let tile = kernels::Tile {
            charges,
            positions,
            scale,
            coulomb_constant,
            group_size,
        };
        guarded(kernel, || {
            self.pool.install(|| {
                partial_energy.par_iter_mut().enumerate().for_each_init(
                    || vec![0.0; group_items],
                    |local, (group, out)| {
                        *out = tile.reduce_group(group % groups, group / groups, local);
                    },
                );
            })
        })
    }
}

/// Supplies the devices an evaluation should run on.
pub trait DeviceEnumerator {
    fn enumerate(&self) -> Result<Vec<Box<dyn ComputeDevice>>, EngineError>;
}

/// Enumerates one [`CpuDevice`] per entry of `thread_counts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuDeviceEnumerator {
    pub thread_counts: Vec<usize>,
}

impl CpuDeviceEnumerator {
    pub fn new(thread_counts: Vec<usize>) -> Self {
        Self { thread_counts }
    }
}

impl Default for CpuDeviceEnumerator {
    fn default() -> Self {
        Self {
            thread_counts: vec![0],
        }
    }
}

impl DeviceEnumerator for CpuDeviceEnumerator {
    fn enumerate(&self) -> Result<Vec<Box<dyn ComputeDevice>>, EngineError> {
        self.thread_counts
            .iter()
            .map(|&threads| {
                CpuDevice::new(threads)
                    .map(|d| Box::new(d) as Box<dyn ComputeDevice>)
                    .map_err(|source| EngineError::Device {
                        device: format!("CPU ({} threads requested)", threads),
                        source,
                    })
            })
            .collect()
    }
}
