//! Pin allocation by number
//!
//! The board configuration names pins by GPIO number. Embassy hands them out
//! as distinct types, so they are erased to `AnyPin` and parked in a
//! [`PinBank`] until something claims them.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Park pins in a bank by number
///
/// Usage:
/// ```ignore
/// bank_insert!(bank, 0 => p.PIN_0, 1 => p.PIN_1);
/// ```
#[macro_export]
macro_rules! bank_insert {
    ($bank:expr, $($num:literal => $pin:expr),+ $(,)?) => {
        $( $bank.insert($num, embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($pin)); )+
    };
}

/// Error when claiming a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already claimed or never parked
    Unavailable(u8),
}

/// Unclaimed pins, by GPIO number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Park a pin. Out-of-range numbers are ignored.
    pub fn insert(&mut self, number: u8, pin: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(number as usize) {
            *slot = Some(pin);
        }
    }

    /// Claim a pin by number
    pub fn take(&mut self, number: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(number as usize)
            .ok_or(PinError::InvalidPin(number))?
            .take()
            .ok_or(PinError::Unavailable(number))
    }
}
