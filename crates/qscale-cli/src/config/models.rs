use qscale::core::io::text::BondFormat;
use qscale::engine::config::EnergyConfig;

/// Fully resolved settings for one `energy` run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub energy: EnergyConfig,
    pub bond_format: BondFormat,
    /// Worker counts of the CPU devices to enumerate, one device per entry.
    pub device_threads: Vec<usize>,
}
