//! Small configuration value types

use super::ConfigError;

/// Number of hardware ADC channels (GPIO26-29 plus the temperature sensor)
pub const HW_ADC_CHANNELS: u8 = 5;

/// Behavior of the virtual button
///
/// The two modes are mutually exclusive per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonMode {
    /// Exposed as the last logical pin; edges are reported once the host
    /// enables events on it
    Report,
    /// Not exposed; a press reboots into the bootloader
    Bootloader,
}

/// Exposed ADC channels
///
/// The exposed channels are always the last `count` hardware channels, so
/// logical channel `c` maps to hardware channel `c + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcChannels {
    count: u8,
}

impl AdcChannels {
    pub fn new(count: u8) -> Result<Self, ConfigError> {
        if count == 0 || count > HW_ADC_CHANNELS {
            return Err(ConfigError::TooManyChannels);
        }
        Ok(Self { count })
    }

    /// Number of exposed channels
    pub fn count(&self) -> u8 {
        self.count
    }

    /// First exposed hardware channel
    pub fn offset(&self) -> u8 {
        HW_ADC_CHANNELS - self.count
    }

    /// Hardware channel backing a logical channel
    pub fn hw_channel(&self, channel: u8) -> Option<u8> {
        (channel < self.count).then(|| channel + self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adc_channel_mapping() {
        // GPIO29 + temperature
        let adc = AdcChannels::new(2).unwrap();
        assert_eq!(adc.offset(), 3);
        assert_eq!(adc.hw_channel(0), Some(3));
        assert_eq!(adc.hw_channel(1), Some(4));
        assert_eq!(adc.hw_channel(2), None);

        // All GPIO channels + temperature
        let adc = AdcChannels::new(5).unwrap();
        assert_eq!(adc.hw_channel(0), Some(0));
        assert_eq!(adc.hw_channel(4), Some(4));
    }

    #[test]
    fn test_adc_channel_count_limits() {
        assert_eq!(AdcChannels::new(0), Err(ConfigError::TooManyChannels));
        assert_eq!(AdcChannels::new(6), Err(ConfigError::TooManyChannels));
    }
}
