use crate::core::forcefield::params::ScalingScheme;
use crate::core::forcefield::potentials::COULOMB_CONSTANT;
use thiserror::Error;

/// Default edge length of a square pair tile in the `coulomb` stage.
pub const DEFAULT_GROUP_SIZE: usize = 16;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// What the evaluation loop does after one device fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and skip every remaining device.
    #[default]
    StopOnFirstFailure,
    /// Record the failure and carry on with the next device.
    Continue,
}

/// Immutable settings shared by the scale-matrix builder and both accumulators.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyConfig {
    pub scaling: ScalingScheme,
    pub coulomb_constant: f64,
    pub group_size: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            scaling: ScalingScheme::default(),
            coulomb_constant: COULOMB_CONSTANT,
            group_size: DEFAULT_GROUP_SIZE,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Default)]
pub struct EnergyConfigBuilder {
    depth_scales: Option<Vec<f64>>,
    default_scale: Option<f64>,
    coulomb_constant: Option<f64>,
    group_size: Option<usize>,
    failure_policy: Option<FailurePolicy>,
}

impl EnergyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth_scales(mut self, scales: Vec<f64>) -> Self {
        self.depth_scales = Some(scales);
        self
    }
    pub fn default_scale(mut self, scale: f64) -> Self {
        self.default_scale = Some(scale);
        self
    }
    pub fn coulomb_constant(mut self, constant: f64) -> Self {
        self.coulomb_constant = Some(constant);
        self
    }
    pub fn group_size(mut self, size: usize) -> Self {
        self.group_size = Some(size);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Fills unset values from [`EnergyConfig::default`] and validates the result.
    pub fn build(self) -> Result<EnergyConfig, ConfigError> {
        let defaults = EnergyConfig::default();

        let depth_scales = self.depth_scales.unwrap_or(defaults.scaling.depth_scales);
        if let Some(bad) = depth_scales.iter().find(|s| !s.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "depth_scales",
                reason: format!("scale {} is not finite", bad),
            });
        }

        let default_scale = self.default_scale.unwrap_or(defaults.scaling.default_scale);
        if !default_scale.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "default_scale",
                reason: format!("{} is not finite", default_scale),
            });
        }

        let coulomb_constant = self.coulomb_constant.unwrap_or(defaults.coulomb_constant);
        if !coulomb_constant.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "coulomb_constant",
                reason: format!("{} is not finite", coulomb_constant),
            });
        }

        let group_size = self.group_size.unwrap_or(defaults.group_size);
        if group_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "group_size",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(EnergyConfig {
            scaling: ScalingScheme::new(depth_scales, default_scale),
            coulomb_constant,
            group_size,
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        })
    }
}
