//! ADC module (ADC handle)

use pinbridge_hal::AdcReader;
use pinbridge_protocol::codec::put_u16;
use pinbridge_protocol::messages::{adc, module_code};
use pinbridge_protocol::Handle;

use crate::config::AdcChannels;
use crate::dispatch::{Module, ModuleError};

/// Hardware samples are 12 bits; the host expects [`adc::DATA_BITS`]
const SAMPLE_SHIFT: u8 = 12 - adc::DATA_BITS;

/// Serves the ADC handle
pub struct AdcModule<A> {
    adc: A,
    channels: AdcChannels,
    /// Bit per logical channel
    enabled_mask: u8,
    enabled: bool,
}

impl<A: AdcReader> AdcModule<A> {
    pub fn new(adc: A, channels: AdcChannels) -> Self {
        Self {
            adc,
            channels,
            enabled_mask: 0,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enabled_mask(&self) -> u8 {
        self.enabled_mask
    }

    fn sample(&mut self, channel: u8) -> Result<u16, ModuleError> {
        let hw = self
            .channels
            .hw_channel(channel)
            .ok_or(ModuleError::OutOfRange)?;
        let raw = self.adc.read_raw(hw).map_err(|_| ModuleError::Hardware)?;
        Ok(raw >> SAMPLE_SHIFT)
    }
}

/// Check the request is exactly `[port]` or `[port][arg]` and return the arg
fn parse(input: &[u8], with_arg: bool) -> Result<u8, ModuleError> {
    let expected = 1 + with_arg as usize;
    if input.len() != expected {
        return Err(ModuleError::InvalidPayload);
    }
    if input[0] != 0 {
        return Err(ModuleError::OutOfRange);
    }
    Ok(input.get(1).copied().unwrap_or(0))
}

impl<A: AdcReader> Module for AdcModule<A> {
    fn handle(&self) -> Handle {
        Handle::Adc
    }

    fn execute(&mut self, id: u16, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError> {
        let code = module_code(id, adc::MODULE_ID).ok_or(ModuleError::UnknownCommand)?;

        match code {
            adc::GET_CHANNEL_COUNT => {
                parse(input, false)?;
                out[0] = self.channels.count();
                Ok(1)
            }
            adc::ENABLE | adc::DISABLE => {
                parse(input, false)?;
                self.enabled = code == adc::ENABLE;
                // No conflicting pins
                put_u16(out, 0);
                Ok(2)
            }
            adc::CHANNEL_ENABLE | adc::CHANNEL_DISABLE => {
                let channel = parse(input, true)?;
                if channel >= self.channels.count() {
                    return Err(ModuleError::OutOfRange);
                }
                if code == adc::CHANNEL_ENABLE {
                    self.enabled_mask |= 1 << channel;
                } else {
                    self.enabled_mask &= !(1 << channel);
                }
                Ok(0)
            }
            adc::SET_RESOLUTION => {
                if parse(input, true)? != adc::DATA_BITS {
                    return Err(ModuleError::InvalidPayload);
                }
                Ok(0)
            }
            adc::CHANNEL_GET_VAL => {
                let channel = parse(input, true)?;
                let value = self.sample(channel)?;
                put_u16(out, value);
                Ok(2)
            }
            adc::CHANNEL_GET_ALL_VAL => {
                parse(input, false)?;
                let len = 2 + 2 * adc::MAX_CHANNELS;
                out[..len].fill(0);
                put_u16(out, self.enabled_mask as u16);
                for channel in 0..self.channels.count() {
                    if self.enabled_mask & (1 << channel) != 0 {
                        let value = self.sample(channel)?;
                        put_u16(&mut out[2 + 2 * channel as usize..], value);
                    }
                }
                Ok(len)
            }
            _ => Err(ModuleError::UnknownCommand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeAdc;
    use pinbridge_protocol::codec::get_u16;
    use pinbridge_protocol::MAX_RESPONSE_PAYLOAD;

    fn module(count: u8) -> AdcModule<FakeAdc> {
        let mut adc = FakeAdc::new();
        adc.raw = [0x100, 0x200, 0x400, 0x800, 0xFFF];
        AdcModule::new(adc, AdcChannels::new(count).unwrap())
    }

    #[test]
    fn test_channel_count() {
        let mut adc = module(2);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];
        assert_eq!(adc.execute(0x0601, &[0], &mut out), Ok(1));
        assert_eq!(out[0], 2);
    }

    #[test]
    fn test_enable_reports_no_conflict() {
        let mut adc = module(2);
        let mut out = [0xFFu8; MAX_RESPONSE_PAYLOAD];
        assert_eq!(adc.execute(0x0602, &[0], &mut out), Ok(2));
        assert_eq!(get_u16(&out), 0);
        assert!(adc.is_enabled());
        adc.execute(0x0603, &[0], &mut out).unwrap();
        assert!(!adc.is_enabled());
    }

    #[test]
    fn test_get_val_maps_and_scales() {
        let mut adc = module(2);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];

        // Logical 0 is hardware channel 3
        assert_eq!(adc.execute(0x060A, &[0, 0], &mut out), Ok(2));
        assert_eq!(get_u16(&out), 0x800 >> 2);
        assert_eq!(adc.execute(0x060A, &[0, 1], &mut out), Ok(2));
        assert_eq!(get_u16(&out), 0x3FF);
        assert_eq!(adc.execute(0x060A, &[0, 2], &mut out), Err(ModuleError::OutOfRange));
    }

    #[test]
    fn test_exact_lengths_and_port() {
        let mut adc = module(2);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];

        assert_eq!(adc.execute(0x0601, &[], &mut out), Err(ModuleError::InvalidPayload));
        assert_eq!(adc.execute(0x0601, &[0, 0], &mut out), Err(ModuleError::InvalidPayload));
        assert_eq!(adc.execute(0x060A, &[0], &mut out), Err(ModuleError::InvalidPayload));
        assert_eq!(adc.execute(0x0601, &[1], &mut out), Err(ModuleError::OutOfRange));
    }

    #[test]
    fn test_resolution_is_fixed() {
        let mut adc = module(2);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];
        assert_eq!(adc.execute(0x0608, &[0, 10], &mut out), Ok(0));
        assert_eq!(adc.execute(0x0608, &[0, 12], &mut out), Err(ModuleError::InvalidPayload));
    }

    #[test]
    fn test_channel_enable_is_range_checked() {
        let mut adc = module(2);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];

        assert_eq!(adc.execute(0x0605, &[0, 1], &mut out), Ok(0));
        assert_eq!(adc.enabled_mask(), 0b10);
        assert_eq!(adc.execute(0x0605, &[0, 2], &mut out), Err(ModuleError::OutOfRange));
        adc.execute(0x0606, &[0, 1], &mut out).unwrap();
        assert_eq!(adc.enabled_mask(), 0);
    }

    #[test]
    fn test_get_all_samples_enabled_channels_only() {
        let mut adc = module(3);
        let mut out = [0xEEu8; MAX_RESPONSE_PAYLOAD];

        adc.execute(0x0605, &[0, 2], &mut out).unwrap();
        assert_eq!(adc.execute(0x060B, &[0], &mut out), Ok(18));
        assert_eq!(get_u16(&out), 0b100);
        assert_eq!(get_u16(&out[2..]), 0);
        assert_eq!(get_u16(&out[4..]), 0);
        assert_eq!(get_u16(&out[6..]), 0xFFF >> 2);
        assert!(out[8..18].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sample_error_is_hardware_failure() {
        let mut adc = module(1);
        adc.adc.fail = true;
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];
        assert_eq!(adc.execute(0x060A, &[0, 0], &mut out), Err(ModuleError::Hardware));
    }
}
