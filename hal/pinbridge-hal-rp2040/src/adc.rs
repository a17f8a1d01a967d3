//! ADC sampling
//!
//! RP2040 has a single ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor
//!
//! Only the last few channels are exposed. GPIOs of unexposed channels go
//! back to the pin bank for use as plain GPIOs.

use embassy_rp::adc::{self, Adc, Blocking, Channel};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{ADC, ADC_TEMP_SENSOR, PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::Peri;

use pinbridge_hal::AdcReader;

use crate::bank_insert;
use crate::pins::PinBank;

/// Number of hardware channels
pub const CHANNEL_COUNT: usize = 5;

/// Pins that can feed the ADC
pub struct AdcPins {
    pub pin26: Peri<'static, PIN_26>,
    pub pin27: Peri<'static, PIN_27>,
    pub pin28: Peri<'static, PIN_28>,
    pub pin29: Peri<'static, PIN_29>,
    pub temp: Peri<'static, ADC_TEMP_SENSOR>,
}

/// Blocking single-shot sampler
pub struct RpAdc {
    adc: Adc<'static, Blocking>,
    channels: [Option<Channel<'static>>; CHANNEL_COUNT],
}

impl RpAdc {
    /// Set up the ADC with hardware channels `first..5`
    ///
    /// # Arguments
    /// * `adc` - The ADC peripheral
    /// * `pins` - All ADC-capable pins
    /// * `first` - First exposed hardware channel
    /// * `bank` - Receives the GPIOs of unexposed channels
    pub fn new(adc: Peri<'static, ADC>, pins: AdcPins, first: u8, bank: &mut PinBank) -> Self {
        let mut channels = [const { None }; CHANNEL_COUNT];

        if first == 0 {
            channels[0] = Some(Channel::new_pin(pins.pin26, Pull::None));
        } else {
            bank_insert!(bank, 26 => pins.pin26);
        }
        if first <= 1 {
            channels[1] = Some(Channel::new_pin(pins.pin27, Pull::None));
        } else {
            bank_insert!(bank, 27 => pins.pin27);
        }
        if first <= 2 {
            channels[2] = Some(Channel::new_pin(pins.pin28, Pull::None));
        } else {
            bank_insert!(bank, 28 => pins.pin28);
        }
        if first <= 3 {
            channels[3] = Some(Channel::new_pin(pins.pin29, Pull::None));
        } else {
            bank_insert!(bank, 29 => pins.pin29);
        }
        channels[4] = Some(Channel::new_temp_sensor(pins.temp));

        Self {
            adc: Adc::new_blocking(adc, adc::Config::default()),
            channels,
        }
    }
}

/// Errors from sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel not exposed
    NoChannel,
    /// Conversion error flag set
    Conversion,
}

impl AdcReader for RpAdc {
    type Error = AdcError;

    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        let channel = self
            .channels
            .get_mut(channel as usize)
            .and_then(Option::as_mut)
            .ok_or(AdcError::NoChannel)?;
        self.adc
            .blocking_read(channel)
            .map_err(|_| AdcError::Conversion)
    }
}
