//! Configuration types
//!
//! Board configuration is validated at build time by the firmware's build
//! script and re-validated here when the runtime structures are built.

pub mod pins;
pub mod types;

pub use pins::*;
pub use types::*;

/// Errors from building the runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// More pins than the table holds
    TooManyPins,
    /// The same physical pin listed twice
    DuplicatePin(u8),
    /// Physical pin number outside the bank
    InvalidPin(u8),
    /// ADC channel count outside 1..=5
    TooManyChannels,
}

/// Complete runtime configuration of the device
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Logical to physical pin mapping
    pub pins: PinTable,
    /// What the virtual button does
    pub button_mode: ButtonMode,
    /// I2C pins are wired to the bus rather than exposed as GPIOs
    pub i2c_available: bool,
    /// Exposed ADC channels
    pub adc: AdcChannels,
    /// Value reported by GET_DEVICE_SN
    pub serial: u32,
}

impl DeviceConfig {
    /// Build and validate a configuration
    pub fn new(
        gpios: &[u8],
        button_mode: ButtonMode,
        i2c_available: bool,
        adc_channels: u8,
        serial: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            pins: PinTable::new(gpios, button_mode)?,
            button_mode,
            i2c_available,
            adc: AdcChannels::new(adc_channels)?,
            serial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_config_validates_parts() {
        let config = DeviceConfig::new(&[2, 3, 4], ButtonMode::Report, true, 2, 0xCAFE).unwrap();
        assert_eq!(config.pins.len(), 4);
        assert_eq!(config.adc.count(), 2);

        assert_eq!(
            DeviceConfig::new(&[2, 2], ButtonMode::Report, true, 2, 0).err(),
            Some(ConfigError::DuplicatePin(2))
        );
        assert_eq!(
            DeviceConfig::new(&[2], ButtonMode::Report, true, 6, 0).err(),
            Some(ConfigError::TooManyChannels)
        );
    }
}
