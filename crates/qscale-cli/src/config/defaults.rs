use qscale::core::forcefield::params::{DEFAULT_DEPTH_SCALES, DEFAULT_UNSCALED};
use qscale::core::forcefield::potentials::COULOMB_CONSTANT;
use qscale::core::io::text::BondFormat;
use qscale::engine::config::DEFAULT_GROUP_SIZE;

pub struct DefaultsConfig {
    pub coulomb_constant: f64,
    pub group_size: usize,
    pub depth_scales: Vec<f64>,
    pub default_scale: f64,
    pub bond_format: BondFormat,
    pub device_threads: usize,
    pub continue_on_failure: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            coulomb_constant: COULOMB_CONSTANT,
            group_size: DEFAULT_GROUP_SIZE,
            depth_scales: DEFAULT_DEPTH_SCALES.to_vec(),
            default_scale: DEFAULT_UNSCALED,
            bond_format: BondFormat::Pairs,
            device_threads: 0,
            continue_on_failure: false,
        }
    }
}
