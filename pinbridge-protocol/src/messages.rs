//! Handles and command ids for the DLN-2 protocol
//!
//! A command id packs a per-module command code in the low byte and the
//! module id in the high byte. The command tables below list the codes;
//! use [`command`] to build the full id and [`module_code`] to split one.

/// Build a full command id from a code and a module id
pub const fn command(code: u8, module: u8) -> u16 {
    code as u16 | ((module as u16) << 8)
}

/// Extract the command code if `id` addresses `module`
///
/// A bare code (module byte 0) is accepted as shorthand for any module.
pub fn module_code(id: u16, module: u8) -> Option<u8> {
    let [code, id_module] = id.to_le_bytes();
    if id_module == module || id_module == 0 {
        Some(code)
    } else {
        None
    }
}

/// Peripheral module selector carried in every header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handle {
    /// Unsolicited device-to-host events
    Event,
    /// Device identity
    Ctrl,
    Gpio,
    I2c,
    /// Not implemented by this device
    Spi,
    Adc,
}

const HANDLE_EVENT: u16 = 0;
const HANDLE_CTRL: u16 = 1;
const HANDLE_GPIO: u16 = 2;
const HANDLE_I2C: u16 = 3;
const HANDLE_SPI: u16 = 4;
const HANDLE_ADC: u16 = 5;

impl Handle {
    /// Parse a handle from its wire value
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            HANDLE_EVENT => Some(Handle::Event),
            HANDLE_CTRL => Some(Handle::Ctrl),
            HANDLE_GPIO => Some(Handle::Gpio),
            HANDLE_I2C => Some(Handle::I2c),
            HANDLE_SPI => Some(Handle::Spi),
            HANDLE_ADC => Some(Handle::Adc),
            _ => None,
        }
    }

    /// Convert to wire value
    pub fn to_u16(self) -> u16 {
        match self {
            Handle::Event => HANDLE_EVENT,
            Handle::Ctrl => HANDLE_CTRL,
            Handle::Gpio => HANDLE_GPIO,
            Handle::I2c => HANDLE_I2C,
            Handle::Spi => HANDLE_SPI,
            Handle::Adc => HANDLE_ADC,
        }
    }
}

/// Generic (CTRL handle) commands
pub mod ctrl {
    pub const MODULE_ID: u8 = 0x00;

    pub const GET_DEVICE_VER: u8 = 0x30;
    pub const GET_DEVICE_SN: u8 = 0x31;

    /// Hardware id reported by GET_DEVICE_VER
    pub const HW_ID: u32 = 0x200;
}

/// GPIO module commands
pub mod gpio {
    pub const MODULE_ID: u8 = 0x01;

    pub const GET_PIN_COUNT: u8 = 0x01;
    pub const SET_DEBOUNCE: u8 = 0x04;
    pub const GET_DEBOUNCE: u8 = 0x05;
    pub const PORT_GET_VAL: u8 = 0x06;
    pub const PIN_GET_VAL: u8 = 0x0B;
    pub const PIN_SET_OUT_VAL: u8 = 0x0C;
    pub const PIN_GET_OUT_VAL: u8 = 0x0D;
    pub const CONDITION_MET_EV: u8 = 0x0F;
    pub const PIN_ENABLE: u8 = 0x10;
    pub const PIN_DISABLE: u8 = 0x11;
    pub const PIN_SET_DIRECTION: u8 = 0x13;
    pub const PIN_GET_DIRECTION: u8 = 0x14;
    pub const PIN_SET_EVENT_CFG: u8 = 0x1E;
    pub const PIN_GET_EVENT_CFG: u8 = 0x1F;
}

/// I2C master module commands
pub mod i2c {
    pub const MODULE_ID: u8 = 0x03;

    pub const GET_PORT_COUNT: u8 = 0x00;
    pub const ENABLE: u8 = 0x01;
    pub const DISABLE: u8 = 0x02;
    pub const IS_ENABLED: u8 = 0x03;
    pub const WRITE: u8 = 0x06;
    pub const READ: u8 = 0x07;
    pub const SCAN_DEVICES: u8 = 0x08;
    pub const PULLUP_ENABLE: u8 = 0x09;
    pub const PULLUP_DISABLE: u8 = 0x0A;
    pub const PULLUP_IS_ENABLED: u8 = 0x0B;
    pub const TRANSFER: u8 = 0x0C;
    pub const SET_MAX_REPLY_COUNT: u8 = 0x0D;
    pub const GET_MAX_REPLY_COUNT: u8 = 0x0E;

    /// Largest 7-bit device address
    pub const MAX_ADDRESS: u8 = 0x7F;
}

/// ADC module commands
pub mod adc {
    pub const MODULE_ID: u8 = 0x06;

    pub const GET_CHANNEL_COUNT: u8 = 0x01;
    pub const ENABLE: u8 = 0x02;
    pub const DISABLE: u8 = 0x03;
    pub const CHANNEL_ENABLE: u8 = 0x05;
    pub const CHANNEL_DISABLE: u8 = 0x06;
    pub const SET_RESOLUTION: u8 = 0x08;
    pub const CHANNEL_GET_VAL: u8 = 0x0A;
    pub const CHANNEL_GET_ALL_VAL: u8 = 0x0B;
    pub const CHANNEL_SET_CFG: u8 = 0x0C;
    pub const CHANNEL_GET_CFG: u8 = 0x0D;
    pub const CONDITION_MET_EV: u8 = 0x10;

    /// Resolution the host driver expects
    pub const DATA_BITS: u8 = 10;

    /// Number of value slots in a CHANNEL_GET_ALL_VAL reply
    pub const MAX_CHANNELS: usize = 8;
}

/// GPIO pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    In,
    Out,
}

const DIRECTION_IN: u8 = 0;
const DIRECTION_OUT: u8 = 1;

impl Direction {
    /// Parse a direction from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            DIRECTION_IN => Some(Direction::In),
            DIRECTION_OUT => Some(Direction::Out),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Direction::In => DIRECTION_IN,
            Direction::Out => DIRECTION_OUT,
        }
    }
}

/// GPIO event trigger type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventType {
    None,
    /// Any level change
    Change,
    LevelHigh,
    LevelLow,
    ChangeRising,
    ChangeFalling,
}

const EVENT_NONE: u8 = 0x00;
const EVENT_CHANGE: u8 = 0x01;
const EVENT_LVL_HIGH: u8 = 0x02;
const EVENT_LVL_LOW: u8 = 0x03;
const EVENT_CHANGE_RISING: u8 = 0x11;
const EVENT_CHANGE_FALLING: u8 = 0x21;

impl EventType {
    /// Parse an event type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            EVENT_NONE => Some(EventType::None),
            EVENT_CHANGE => Some(EventType::Change),
            EVENT_LVL_HIGH => Some(EventType::LevelHigh),
            EVENT_LVL_LOW => Some(EventType::LevelLow),
            EVENT_CHANGE_RISING => Some(EventType::ChangeRising),
            EVENT_CHANGE_FALLING => Some(EventType::ChangeFalling),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            EventType::None => EVENT_NONE,
            EventType::Change => EVENT_CHANGE,
            EventType::LevelHigh => EVENT_LVL_HIGH,
            EventType::LevelLow => EVENT_LVL_LOW,
            EventType::ChangeRising => EVENT_CHANGE_RISING,
            EventType::ChangeFalling => EVENT_CHANGE_FALLING,
        }
    }

    /// Returns true if the device can deliver this trigger type
    ///
    /// The host driver only ever configures NONE and CHANGE.
    pub fn is_supported(&self) -> bool {
        matches!(self, EventType::None | EventType::Change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_packing() {
        assert_eq!(command(gpio::GET_PIN_COUNT, gpio::MODULE_ID), 0x0101);
        assert_eq!(command(ctrl::GET_DEVICE_SN, ctrl::MODULE_ID), 0x0031);
        assert_eq!(command(adc::CHANNEL_GET_VAL, adc::MODULE_ID), 0x060A);
        assert_eq!(command(gpio::CONDITION_MET_EV, gpio::MODULE_ID), 0x010F);
    }

    #[test]
    fn test_module_code_accepts_own_and_bare_ids() {
        assert_eq!(module_code(0x0101, gpio::MODULE_ID), Some(gpio::GET_PIN_COUNT));
        assert_eq!(module_code(0x0001, gpio::MODULE_ID), Some(gpio::GET_PIN_COUNT));
        assert_eq!(module_code(0x0307, i2c::MODULE_ID), Some(i2c::READ));
    }

    #[test]
    fn test_module_code_rejects_other_modules() {
        assert_eq!(module_code(0x0301, gpio::MODULE_ID), None);
        assert_eq!(module_code(0x0102, adc::MODULE_ID), None);
    }

    #[test]
    fn test_handle_roundtrip() {
        let handles = [
            Handle::Event,
            Handle::Ctrl,
            Handle::Gpio,
            Handle::I2c,
            Handle::Spi,
            Handle::Adc,
        ];

        for handle in handles {
            assert_eq!(Handle::from_u16(handle.to_u16()), Some(handle));
        }
        assert_eq!(Handle::from_u16(6), None);
        assert_eq!(Handle::Gpio.to_u16(), 2);
    }

    #[test]
    fn test_direction_bytes() {
        assert_eq!(Direction::from_byte(0), Some(Direction::In));
        assert_eq!(Direction::from_byte(1), Some(Direction::Out));
        assert_eq!(Direction::from_byte(2), None);
        assert_eq!(Direction::Out.to_byte(), 1);
    }

    #[test]
    fn test_event_type_support() {
        assert!(EventType::from_byte(0x00).unwrap().is_supported());
        assert!(EventType::from_byte(0x01).unwrap().is_supported());
        assert!(!EventType::from_byte(0x11).unwrap().is_supported());
        assert!(!EventType::from_byte(0x03).unwrap().is_supported());
        assert_eq!(EventType::from_byte(0x04), None);
        assert_eq!(EventType::ChangeFalling.to_byte(), 0x21);
    }
}
