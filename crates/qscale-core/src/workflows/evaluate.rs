use crate::core::models::molecule::Molecule;
use crate::engine::config::{EnergyConfig, FailurePolicy};
use crate::engine::device::{ComputeDevice, DeviceEnumerator};
use crate::engine::dispatch::run_on_device;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter, Stage};
use crate::engine::reference;
use crate::engine::state::{DeviceOutcome, DeviceStatus, EnergyReport};
use tracing::{error, info, instrument, warn};

const REFERENCE_COMPUTATION_NAME: &str = "Reference (sequential)";

/// Evaluates the bond-scaled Coulomb energy on every enumerated device and on
/// the sequential reference path.
///
/// Devices run one after another in enumeration order. A device failure is
/// recorded in the report rather than returned; with
/// [`FailurePolicy::StopOnFirstFailure`] the devices after it are listed as
/// skipped. When no device is available the accelerated path is skipped and
/// only the reference energy is computed.
#[instrument(skip_all, name = "energy_workflow")]
pub fn run(
    molecule: &Molecule,
    config: &EnergyConfig,
    enumerator: &dyn DeviceEnumerator,
    reporter: &ProgressReporter,
) -> Result<EnergyReport, EngineError> {
    let devices = match enumerator.enumerate() {
        Ok(devices) => devices,
        Err(EngineError::Environment(reason)) => {
            warn!(%reason, "Device enumeration failed.");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    if devices.is_empty() {
        warn!("No compute devices available; skipping the accelerated path.");
        reporter.report(Progress::Message(
            "No compute devices found, running the reference path only.".to_string(),
        ));
    }

    reporter.report(Progress::RunStart {
        computations: devices.len() as u64 + 1,
    });
    info!(
        atoms = molecule.atom_count(),
        devices = devices.len(),
        "Starting energy evaluation."
    );

    let (outcomes, skipped_devices) = run_devices(&devices, molecule, config, reporter);

    reporter.report(Progress::ComputationStart {
        name: REFERENCE_COMPUTATION_NAME.to_string(),
    });
    reporter.report(Progress::StageStart(Stage::Reference));
    let reference = reference::run(molecule, config);
    reporter.report(Progress::ComputationFinish);

    reporter.report(Progress::RunFinish);

    let report = EnergyReport {
        atom_count: molecule.atom_count(),
        devices: outcomes,
        skipped_devices,
        reference_energy: reference.energy,
        reference_timings: reference.timings,
    };
    if let Some(deviation) = report.max_relative_deviation() {
        info!(deviation, "Largest relative deviation from the reference path.");
    }
    Ok(report)
}

fn run_devices(
    devices: &[Box<dyn ComputeDevice>],
    molecule: &Molecule,
    config: &EnergyConfig,
    reporter: &ProgressReporter,
) -> (Vec<DeviceOutcome>, Vec<String>) {
    let mut outcomes = Vec::with_capacity(devices.len());
    let mut skipped = Vec::new();

    for device in devices {
        let name = device.name().to_string();
        if !skipped.is_empty() || halted(&outcomes, config.failure_policy) {
            skipped.push(name);
            continue;
        }

        reporter.report(Progress::ComputationStart { name: name.clone() });
        let status = match run_on_device(device.as_ref(), molecule, config, reporter) {
            Ok(run) => DeviceStatus::Completed {
                energy: run.energy,
                timings: run.timings,
            },
            Err(e) => {
                error!(device = %name, code = e.code, message = %e.message, "Device computation failed.");
                DeviceStatus::Failed { error: e }
            }
        };
        reporter.report(Progress::ComputationFinish);
        outcomes.push(DeviceOutcome {
            device: name,
            status,
        });
    }

    if !skipped.is_empty() {
        warn!(
            skipped = skipped.len(),
            "Stopped after the first device failure."
        );
    }
    (outcomes, skipped)
}

fn halted(outcomes: &[DeviceOutcome], policy: FailurePolicy) -> bool {
    policy == FailurePolicy::StopOnFirstFailure && outcomes.iter().any(DeviceOutcome::is_failure)
}
