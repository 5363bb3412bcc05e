use crate::cli::DevicesArgs;
use crate::config::PartialEnergyConfig;
use crate::error::Result;
use qscale::engine::device::{CpuDeviceEnumerator, DeviceEnumerator};
use tracing::info;

pub fn run(args: DevicesArgs, threads: Option<usize>) -> Result<()> {
    let thread_counts = PartialEnergyConfig::from_optional_file(args.config.as_deref())?
        .device_threads_with_cli(&args, threads)?;
    let devices = CpuDeviceEnumerator::new(thread_counts).enumerate()?;
    info!(count = devices.len(), "Devices enumerated.");

    if devices.is_empty() {
        println!("No compute devices available; only the reference path would run.");
        return Ok(());
    }
    for (index, device) in devices.iter().enumerate() {
        println!("[{}] {}", index, device.name());
    }
    Ok(())
}
