use crate::cli::EnergyArgs;
use crate::config::PartialEnergyConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use qscale::{
    core::io::text::{MoleculeSource, TextError},
    core::models::molecule::Molecule,
    engine::{
        device::CpuDeviceEnumerator,
        error::EngineError,
        progress::ProgressReporter,
        state::{DeviceStatus, EnergyReport, StageTimings},
    },
    workflows,
};
use std::fmt::Write;
use tracing::{info, warn};

pub fn run(args: EnergyArgs, threads: Option<usize>) -> Result<()> {
    let partial_config = PartialEnergyConfig::from_optional_file(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let app_config = partial_config.merge_with_cli(&args, threads)?;

    let source = MoleculeSource {
        positions: args.positions,
        charges: args.charges,
        bonds: args.bonds,
        bond_format: app_config.bond_format,
    };
    info!("Loading molecule from {:?}", &source);
    let molecule = load_molecule(&source)?;
    info!(
        atoms = molecule.atom_count(),
        bonds = molecule.bonds().bond_count(),
        net_charge = molecule.net_charge(),
        "Molecule loaded."
    );

    let enumerator = CpuDeviceEnumerator::new(app_config.device_threads.clone());
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Evaluating {} atom(s) on {} device(s) plus the reference path...",
        molecule.atom_count(),
        enumerator.thread_counts.len()
    );
    let report = workflows::evaluate::run(&molecule, &app_config.energy, &enumerator, &reporter)?;

    print!("{}", format_report(&report));

    if let Some(failed) = report.failures().next() {
        warn!("At least one device failed; see the report above.");
        if let DeviceStatus::Failed { error } = &failed.status {
            return Err(CliError::Core(EngineError::Device {
                device: failed.device.clone(),
                source: error.clone(),
            }));
        }
    }
    Ok(())
}

/// Loads the molecule, keeping the failing file in file-level errors.
fn load_molecule(source: &MoleculeSource) -> Result<Molecule> {
    source.load().map_err(|e| match e {
        TextError::InFile { path, source } => CliError::FileParsing {
            path,
            source: (*source).into(),
        },
        TextError::Inconsistency(model) => CliError::Core(EngineError::from(model)),
        other => CliError::Argument(other.to_string()),
    })
}

fn format_timings(timings: &StageTimings) -> String {
    format!(
        "prepare {:.3} ms, execute {:.3} ms",
        timings.prepare.as_secs_f64() * 1e3,
        timings.execute.as_secs_f64() * 1e3
    )
}

/// Renders the report as plain text, one block per device and one for the
/// reference path.
pub fn format_report(report: &EnergyReport) -> String {
    let mut out = String::new();

    if report.accelerated_path_skipped() {
        let _ = writeln!(out, "No compute devices available; accelerated path skipped.");
    }

    for outcome in &report.devices {
        let _ = writeln!(out, "Device: {}", outcome.device);
        let _ = writeln!(out, "  Atoms:  {}", report.atom_count);
        match &outcome.status {
            DeviceStatus::Completed { energy, timings } => {
                let _ = writeln!(out, "  Timing: {}", format_timings(timings));
                let _ = writeln!(out, "  Energy: {:.6} kcal/mol", energy);
            }
            DeviceStatus::Failed { error } => {
                let _ = writeln!(out, "  Failed: {}", error);
            }
        }
    }

    for name in &report.skipped_devices {
        let _ = writeln!(out, "Device: {}", name);
        let _ = writeln!(out, "  Skipped after an earlier device failure.");
    }

    let _ = writeln!(out, "Reference (sequential)");
    let _ = writeln!(out, "  Atoms:  {}", report.atom_count);
    let _ = writeln!(out, "  Timing: {}", format_timings(&report.reference_timings));
    let _ = writeln!(out, "  Energy: {:.6} kcal/mol", report.reference_energy);

    if let Some(deviation) = report.max_relative_deviation() {
        let _ = writeln!(
            out,
            "Largest relative deviation from reference: {:.3e}",
            deviation
        );
    }
    out
}
