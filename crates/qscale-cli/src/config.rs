mod defaults;
mod models;

pub use defaults::DefaultsConfig;
pub use models::AppConfig;

use crate::cli::{DeviceSelection, DevicesArgs, EnergyArgs};
use crate::error::{CliError, Result};
use qscale::core::io::text::BondFormat;
use qscale::engine::config::{EnergyConfigBuilder, FailurePolicy};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialScalingConfig {
    #[serde(rename = "depth-scales")]
    depth_scales: Option<Vec<f64>>,
    #[serde(rename = "default-scale")]
    default_scale: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDevicesConfig {
    threads: Option<Vec<usize>>,
    #[serde(rename = "continue-on-failure")]
    continue_on_failure: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialInputConfig {
    #[serde(rename = "bond-format")]
    bond_format: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialEnergyConfig {
    #[serde(rename = "coulomb-constant")]
    coulomb_constant: Option<f64>,
    #[serde(rename = "group-size")]
    group_size: Option<usize>,
    scaling: Option<PartialScalingConfig>,
    devices: Option<PartialDevicesConfig>,
    input: Option<PartialInputConfig>,
}

impl PartialEnergyConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final settings.
    ///
    /// Precedence, highest first: explicit flags, `-S` values, the config
    /// file, then [`DefaultsConfig`].
    pub fn merge_with_cli(mut self, args: &EnergyArgs, threads: Option<usize>) -> Result<AppConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let scaling = self.scaling.take().unwrap_or_default();
        let devices = self.devices.take().unwrap_or_default();
        let input = self.input.take().unwrap_or_default();

        let bond_format = match (args.bond_format, input.bond_format) {
            (Some(format), _) => format,
            (None, Some(name)) => BondFormat::from_str(&name).map_err(CliError::Config)?,
            (None, None) => defaults.bond_format,
        };

        let continue_on_failure = args.continue_on_failure
            || devices
                .continue_on_failure
                .unwrap_or(defaults.continue_on_failure);
        let failure_policy = if continue_on_failure {
            FailurePolicy::Continue
        } else {
            FailurePolicy::StopOnFirstFailure
        };

        let device_threads = resolve_device_threads(&args.selection, devices.threads, threads);

        let energy = EnergyConfigBuilder::new()
            .coulomb_constant(
                args.coulomb_constant
                    .or(self.coulomb_constant)
                    .unwrap_or(defaults.coulomb_constant),
            )
            .group_size(
                args.group_size
                    .or(self.group_size)
                    .unwrap_or(defaults.group_size),
            )
            .depth_scales(scaling.depth_scales.unwrap_or(defaults.depth_scales))
            .default_scale(scaling.default_scale.unwrap_or(defaults.default_scale))
            .failure_policy(failure_policy)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            energy,
            bond_format,
            device_threads,
        })
    }

    /// Resolves only the device list, with the same precedence as
    /// [`merge_with_cli`](Self::merge_with_cli).
    pub fn device_threads_with_cli(
        mut self,
        args: &DevicesArgs,
        threads: Option<usize>,
    ) -> Result<Vec<usize>> {
        self.apply_set_values(&args.set_values)?;
        let devices = self.devices.take().unwrap_or_default();
        Ok(resolve_device_threads(&args.selection, devices.threads, threads))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "coulomb-constant" => {
                    self.coulomb_constant = Some(parse_value(key, value_str)?);
                }
                "group-size" => {
                    self.group_size = Some(parse_value(key, value_str)?);
                }
                "scaling.depth-scales" => {
                    self.scaling
                        .get_or_insert_with(Default::default)
                        .depth_scales = Some(parse_list(key, value_str)?);
                }
                "scaling.default-scale" => {
                    self.scaling
                        .get_or_insert_with(Default::default)
                        .default_scale = Some(parse_value(key, value_str)?);
                }
                "devices.threads" => {
                    self.devices.get_or_insert_with(Default::default).threads =
                        Some(parse_list(key, value_str)?);
                }
                "devices.continue-on-failure" => {
                    self.devices
                        .get_or_insert_with(Default::default)
                        .continue_on_failure = Some(parse_value(key, value_str)?);
                }
                "input.bond-format" => {
                    self.input.get_or_insert_with(Default::default).bond_format =
                        Some(value_str.to_string());
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// `--devices`, then the configured list, then one device sized by `-j`.
fn resolve_device_threads(
    selection: &DeviceSelection,
    configured: Option<Vec<usize>>,
    threads: Option<usize>,
) -> Vec<usize> {
    selection
        .devices
        .clone()
        .or(configured)
        .unwrap_or_else(|| vec![threads.unwrap_or(DefaultsConfig::default().device_threads)])
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}

/// Parses a comma-separated list, with or without surrounding brackets.
fn parse_list<T: FromStr>(key: &str, value_str: &str) -> Result<Vec<T>> {
    let inner = value_str
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|item| parse_value(key, item.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use qscale::core::forcefield::params::ScalingScheme;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("qscale.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn energy_args(extra: &[&str]) -> EnergyArgs {
        let mut args = vec![
            "qscale", "energy", "-p", "pos.txt", "--charges", "q.txt", "-b", "bonds.txt",
        ];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Energy(args) => args,
            _ => panic!("Expected 'energy' subcommand"),
        }
    }

    fn devices_args(extra: &[&str]) -> DevicesArgs {
        let mut args = vec!["qscale", "devices"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Devices(args) => args,
            _ => panic!("Expected 'devices' subcommand"),
        }
    }

    #[test]
    fn no_file_and_no_flags_yields_defaults() {
        let config = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&[]), None)
            .unwrap();
        let defaults = DefaultsConfig::default();
        assert_eq!(config.energy.coulomb_constant, defaults.coulomb_constant);
        assert_eq!(config.energy.group_size, defaults.group_size);
        assert_eq!(config.energy.scaling, ScalingScheme::default());
        assert_eq!(
            config.energy.failure_policy,
            FailurePolicy::StopOnFirstFailure
        );
        assert_eq!(config.bond_format, BondFormat::Pairs);
        assert_eq!(config.device_threads, vec![0]);
    }

    #[test]
    fn file_values_are_loaded_and_merged() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            coulomb-constant = 1.0
            group-size = 4

            [scaling]
            depth-scales = [0.0, 0.5]
            default-scale = 0.9

            [devices]
            threads = [1, 2]
            continue-on-failure = true

            [input]
            bond-format = "matrix"
            "#,
        );
        let config = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&energy_args(&[]), None)
            .unwrap();
        assert_eq!(config.energy.coulomb_constant, 1.0);
        assert_eq!(config.energy.group_size, 4);
        assert_eq!(config.energy.scaling, ScalingScheme::new(vec![0.0, 0.5], 0.9));
        assert_eq!(config.energy.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.bond_format, BondFormat::Matrix);
        assert_eq!(config.device_threads, vec![1, 2]);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            group-size = 4 # Will be overridden

            [devices]
            threads = [1, 2] # Will be overridden
            "#,
        );
        let args = energy_args(&["--group-size", "32", "--devices", "3", "--bond-format", "matrix"]);
        let config = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args, Some(8))
            .unwrap();
        assert_eq!(config.energy.group_size, 32);
        assert_eq!(config.device_threads, vec![3]);
        assert_eq!(config.bond_format, BondFormat::Matrix);
    }

    #[test]
    fn set_values_override_file_but_not_flags() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "coulomb-constant = 2.0\n");
        let args = energy_args(&[
            "--group-size",
            "2",
            "-S",
            "coulomb-constant=3.5",
            "-S",
            "group-size=64",
            "-S",
            "scaling.depth-scales=[0, 0, 0.25]",
        ]);
        let config = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args, None)
            .unwrap();
        assert_eq!(config.energy.coulomb_constant, 3.5);
        assert_eq!(config.energy.group_size, 2);
        assert_eq!(config.energy.scaling.depth_scales, vec![0.0, 0.0, 0.25]);
    }

    #[test]
    fn threads_flag_sizes_the_default_device() {
        let config = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&[]), Some(6))
            .unwrap();
        assert_eq!(config.device_threads, vec![6]);
    }

    #[test]
    fn empty_device_list_disables_the_accelerated_path() {
        let config = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["-S", "devices.threads=[]"]), None)
            .unwrap();
        assert!(config.device_threads.is_empty());
    }

    #[test]
    fn devices_command_resolves_threads_like_energy() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[devices]\nthreads = [1, 2]\n");
        let path_arg = path.to_str().unwrap();

        let from_file = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .device_threads_with_cli(&devices_args(&["-c", path_arg]), Some(8))
            .unwrap();
        let energy = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&energy_args(&["-c", path_arg]), Some(8))
            .unwrap();
        assert_eq!(from_file, vec![1, 2]);
        assert_eq!(from_file, energy.device_threads);

        let from_set = PartialEnergyConfig::from_file(&path)
            .unwrap()
            .device_threads_with_cli(&devices_args(&["-S", "devices.threads=[4]"]), None)
            .unwrap();
        assert_eq!(from_set, vec![4]);

        let from_flag = PartialEnergyConfig::default()
            .device_threads_with_cli(&devices_args(&["--devices", "3,5"]), None)
            .unwrap();
        assert_eq!(from_flag, vec![3, 5]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "dielectric = 4.0\n");
        assert!(matches!(
            PartialEnergyConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let result = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["-S", "scaling.depth=3"]), None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn invalid_values_are_reported_as_config_errors() {
        let bad_number = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["-S", "group-size=many"]), None);
        assert!(matches!(bad_number, Err(CliError::Config(_))));

        let zero_group = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["--group-size", "0"]), None);
        assert!(matches!(zero_group, Err(CliError::Config(_))));

        let missing_equals = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["-S", "group-size"]), None);
        assert!(matches!(missing_equals, Err(CliError::Config(_))));

        let bad_format = PartialEnergyConfig::default()
            .merge_with_cli(&energy_args(&["-S", "input.bond-format=csv"]), None);
        assert!(matches!(bad_format, Err(CliError::Config(_))));
    }
}
