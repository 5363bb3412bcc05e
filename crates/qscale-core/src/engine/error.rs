use thiserror::Error;

use super::config::ConfigError;
use super::device::DeviceError;
use crate::core::models::molecule::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid molecule: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Compute environment unavailable: {0}")]
    Environment(String),

    #[error("Device '{device}' failed: {source}")]
    Device {
        device: String,
        #[source]
        source: DeviceError,
    },
}
