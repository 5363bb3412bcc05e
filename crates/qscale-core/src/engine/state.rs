use super::device::DeviceError;
use std::time::Duration;

/// Wall-clock time spent in the two phases of one computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    /// Allocating and filling buffers (or the scale matrix, on the reference path).
    pub prepare: Duration,
    /// Running the kernels or loops and collecting the total.
    pub execute: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceStatus {
    Completed { energy: f64, timings: StageTimings },
    Failed { error: DeviceError },
}

/// Result of the full two-stage computation on one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOutcome {
    pub device: String,
    pub status: DeviceStatus,
}

impl DeviceOutcome {
    pub fn energy(&self) -> Option<f64> {
        match self.status {
            DeviceStatus::Completed { energy, .. } => Some(energy),
            DeviceStatus::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, DeviceStatus::Failed { .. })
    }
}

/// Everything one evaluation produced, in the order it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub atom_count: usize,
    /// Outcomes of the devices that ran, in enumeration order.
    pub devices: Vec<DeviceOutcome>,
    /// Devices that were enumerated but not run because an earlier one failed.
    pub skipped_devices: Vec<String>,
    pub reference_energy: f64,
    pub reference_timings: StageTimings,
}

impl EnergyReport {
    /// `true` when no device was available and only the reference path ran.
    pub fn accelerated_path_skipped(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.devices.iter().filter(|d| d.is_failure())
    }

    /// Largest relative deviation of any completed device from the reference.
    ///
    /// The deviation is `|device - reference| / max(|reference|, f64::EPSILON)`.
    /// Returns `None` if no device completed.
    pub fn max_relative_deviation(&self) -> Option<f64> {
        let denom = self.reference_energy.abs().max(f64::EPSILON);
        self.devices
            .iter()
            .filter_map(DeviceOutcome::energy)
            .map(|e| (e - self.reference_energy).abs() / denom)
            .reduce(f64::max)
    }
}
