//! Demo bridge that simulates a handful of bridged lights.
//!
//! Builds the device table from configuration, wires every device to a
//! change dispatcher backed by a logging reporter, and walks through a
//! short sequence of state changes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;

use virtual_device_bridge::config::BridgeConfig;
use virtual_device_bridge::device::Device;
use virtual_device_bridge::registry::DeviceRegistry;
use virtual_device_bridge::report::{ChangeDispatcher, LogReporter};

#[derive(Parser)]
#[command(name = "virtual-device-bridge")]
#[command(about = "Virtual device bridge demo")]
struct Cli {
    /// Path to a JSON device table; built-in defaults are used when omitted
    #[arg(long, env = "BRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match BridgeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config from {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => BridgeConfig::from_env(),
    };

    info!("Starting virtual device bridge");
    info!("  First endpoint id: {}", config.first_endpoint_id);
    info!("  Devices: {}", config.devices.len());

    let dispatcher = Arc::new(ChangeDispatcher::new(LogReporter));

    let mut registry = DeviceRegistry::new(config.first_endpoint_id);
    for entry in &config.devices {
        let mut device = Device::new(&entry.name, &entry.location);
        device.set_change_callback(dispatcher.clone().callback());
        if let Err(e) = registry.register(device) {
            log::error!("Failed to register \"{}\": {e}", entry.name);
            break;
        }
    }

    // Bring every device online, then run a short simulation
    for device in registry.iter_mut() {
        device.set_reachable(true);
    }
    for device in registry.iter_mut() {
        device.set_on_off(true);
    }

    if let Some(device) = registry.get_mut(config.first_endpoint_id) {
        device.set_name("Reading Lamp");
        device.set_location("Den");
        device.set_on_off(false);
    }

    info!("Simulation complete");
}
