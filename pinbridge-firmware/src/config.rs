//! Board configuration
//!
//! `board_config.rs` is generated by build.rs from board.toml, which has
//! already been validated by the time this compiles.

use pinbridge_core::config::{ButtonMode, ConfigError, DeviceConfig};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Build the runtime configuration for this board
pub fn device_config(serial: u32) -> Result<DeviceConfig, ConfigError> {
    DeviceConfig::new(GPIO_PINS, BUTTON_MODE, I2C_ENABLED, ADC_CHANNELS, serial)
}
