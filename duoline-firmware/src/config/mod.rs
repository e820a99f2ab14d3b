//! Configuration loading
//!
//! `device.toml` is compiled into the image and parsed once at startup.

use defmt::*;
use duoline_core::config::{parse_config, DeviceConfig};

/// Embedded configuration; edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../device.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded: {}", config);
            config
        }
        Err(e) => {
            error!("device.toml rejected ({}), using defaults", e);
            DeviceConfig::default()
        }
    }
}
