use clap::{Args, Parser, Subcommand};
use qscale::core::io::text::BondFormat;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan",
    version,
    about = "qscale CLI - Bond-scaled Coulomb energies on parallel compute devices, checked against a sequential reference.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Worker threads of the default CPU device (used when --devices is not given).
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the total scaled Coulomb energy of a molecule on every device and the reference path.
    Energy(EnergyArgs),
    /// List the compute devices an `energy` run would use.
    Devices(DevicesArgs),
}

/// Device selection shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct DeviceSelection {
    /// Comma-separated worker counts, one CPU device per entry (0 means all cores).
    /// Pass an empty list to run the reference path only.
    #[arg(long, value_name = "THREADS,...", value_delimiter = ',', num_args(0..))]
    pub devices: Option<Vec<usize>>,
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    // --- Input Files ---
    /// Atom positions, one `x y z` line per atom.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub positions: PathBuf,

    /// Atom charges, one value per line.
    #[arg(long, required = true, value_name = "PATH")]
    pub charges: PathBuf,

    /// Bond file, as index pairs or a 0/1 adjacency matrix (see --bond-format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub bonds: PathBuf,

    /// Encoding of the bond file: 'pairs' or 'matrix'.
    #[arg(long, value_name = "FORMAT")]
    pub bond_format: Option<BondFormat>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Energy Overrides ---
    /// Override the Coulomb constant, in kcal·Å/(mol·e²).
    #[arg(long, value_name = "FLOAT")]
    pub coulomb_constant: Option<f64>,

    /// Override the edge length of a square pair tile.
    #[arg(short, long, value_name = "INT")]
    pub group_size: Option<usize>,

    #[command(flatten)]
    pub selection: DeviceSelection,

    /// Keep running the remaining devices after one fails.
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scaling.default-scale=0.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `devices` subcommand.
#[derive(Args, Debug)]
pub struct DevicesArgs {
    #[command(flatten)]
    pub selection: DeviceSelection,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Example: -S devices.threads=[1,4]
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
