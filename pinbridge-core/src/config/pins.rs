//! Logical pin table
//!
//! Maps the dense logical pin indices the host sees onto physical GPIO
//! numbers. The virtual button, when exposed, takes the highest index.

use heapless::Vec;

use super::{ButtonMode, ConfigError};

/// Number of physical GPIOs in the bank
pub const NUM_GPIOS: usize = 30;

/// Maximum logical pins (every GPIO plus the button)
pub const MAX_PINS: usize = NUM_GPIOS + 1;

/// What backs a logical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSource {
    /// A physical GPIO
    Gpio(u8),
    /// The debounced board button
    Button,
}

/// Dense logical to physical pin mapping with reverse lookup
#[derive(Debug, Clone)]
pub struct PinTable {
    gpios: Vec<u8, MAX_PINS>,
    reverse: [Option<u16>; NUM_GPIOS],
    has_button: bool,
}

impl PinTable {
    /// Build a pin table
    ///
    /// # Arguments
    /// * `gpios` - Physical pins in logical order
    /// * `mode` - In `ButtonMode::Report` the button is appended as the last pin
    pub fn new(gpios: &[u8], mode: ButtonMode) -> Result<Self, ConfigError> {
        let mut table = Self {
            gpios: Vec::new(),
            reverse: [None; NUM_GPIOS],
            has_button: mode == ButtonMode::Report,
        };

        for (logical, &pin) in gpios.iter().enumerate() {
            let slot = table
                .reverse
                .get_mut(pin as usize)
                .ok_or(ConfigError::InvalidPin(pin))?;
            if slot.is_some() {
                return Err(ConfigError::DuplicatePin(pin));
            }
            *slot = Some(logical as u16);
            table.gpios.push(pin).map_err(|_| ConfigError::TooManyPins)?;
        }

        Ok(table)
    }

    /// Number of logical pins, including the button
    pub fn len(&self) -> usize {
        self.gpios.len() + self.has_button as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What backs a logical pin
    pub fn source(&self, logical: u16) -> Option<PinSource> {
        let index = logical as usize;
        if let Some(&pin) = self.gpios.get(index) {
            Some(PinSource::Gpio(pin))
        } else if self.has_button && index == self.gpios.len() {
            Some(PinSource::Button)
        } else {
            None
        }
    }

    /// Logical index of a physical pin
    pub fn logical(&self, physical: u8) -> Option<u16> {
        self.reverse.get(physical as usize).copied().flatten()
    }

    /// Logical index reserved for the button, if exposed
    pub fn button_index(&self) -> Option<u16> {
        self.has_button.then(|| self.gpios.len() as u16)
    }

    /// Physical pins in logical order
    pub fn gpios(&self) -> &[u8] {
        &self.gpios
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PINS: [u8; 5] = [2, 3, 4, 18, 25];

    #[test]
    fn test_forward_and_reverse_lookup() {
        let table = PinTable::new(&PINS, ButtonMode::Bootloader).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.source(3), Some(PinSource::Gpio(18)));
        assert_eq!(table.logical(18), Some(3));
        assert_eq!(table.logical(5), None);
        assert_eq!(table.logical(200), None);
        assert_eq!(table.source(5), None);
        assert_eq!(table.button_index(), None);
    }

    #[test]
    fn test_button_is_last_pin() {
        let table = PinTable::new(&PINS, ButtonMode::Report).unwrap();

        assert_eq!(table.len(), 6);
        assert_eq!(table.button_index(), Some(5));
        assert_eq!(table.source(5), Some(PinSource::Button));
        assert_eq!(table.source(6), None);
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = PinTable::new(&[2, 3, 2], ButtonMode::Report);
        assert_eq!(result.err(), Some(ConfigError::DuplicatePin(2)));
    }

    #[test]
    fn test_rejects_invalid_pin() {
        let result = PinTable::new(&[2, 30], ButtonMode::Report);
        assert_eq!(result.err(), Some(ConfigError::InvalidPin(30)));
    }

    #[test]
    fn test_reverse_lookup_is_unambiguous() {
        let all: [u8; NUM_GPIOS] = core::array::from_fn(|i| (NUM_GPIOS - 1 - i) as u8);
        let table = PinTable::new(&all, ButtonMode::Report).unwrap();

        for logical in 0..NUM_GPIOS as u16 {
            let Some(PinSource::Gpio(pin)) = table.source(logical) else {
                panic!("missing pin {}", logical);
            };
            assert_eq!(table.logical(pin), Some(logical));
        }
        assert_eq!(table.len(), MAX_PINS);
    }
}
