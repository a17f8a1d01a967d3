//! Unsolicited GPIO condition events

use crate::codec::{get_u16, put_u16};
use crate::messages::{command, gpio};

/// Size of a GPIO event payload
pub const EVENT_PAYLOAD_SIZE: usize = 6;

/// Command id carried by GPIO event frames
pub const CONDITION_MET_ID: u16 = command(gpio::CONDITION_MET_EV, gpio::MODULE_ID);

/// A level change on a logical pin
///
/// Wire layout:
/// ```text
/// 0: u16 count   (unused by the host, always 0)
/// 2: u8  type    (unused by the host, always 0)
/// 3: u16 pin     logical pin index
/// 5: u8  value   level sampled when the event was built
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinEvent {
    pub pin: u16,
    pub value: u8,
}

impl PinEvent {
    pub fn new(pin: u16, high: bool) -> Self {
        Self {
            pin,
            value: high as u8,
        }
    }

    /// Convert to the wire payload
    pub fn to_bytes(&self) -> [u8; EVENT_PAYLOAD_SIZE] {
        let mut payload = [0u8; EVENT_PAYLOAD_SIZE];
        put_u16(&mut payload[3..], self.pin);
        payload[5] = self.value;
        payload
    }

    /// Parse a wire payload (for testing or simulation)
    pub fn from_bytes(payload: &[u8]) -> Option<Self> {
        if payload.len() != EVENT_PAYLOAD_SIZE {
            return None;
        }
        Some(Self {
            pin: get_u16(&payload[3..]),
            value: payload[5],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_layout() {
        let event = PinEvent::new(3, true);
        assert_eq!(event.to_bytes(), [0, 0, 0, 3, 0, 1]);

        let event = PinEvent::new(0x0102, false);
        assert_eq!(event.to_bytes(), [0, 0, 0, 0x02, 0x01, 0]);
    }

    #[test]
    fn test_event_parse() {
        let event = PinEvent::from_bytes(&[0, 0, 0, 7, 0, 1]).unwrap();
        assert_eq!(event.pin, 7);
        assert_eq!(event.value, 1);
        assert_eq!(PinEvent::from_bytes(&[0, 0, 0, 7, 0]), None);
    }

    #[test]
    fn test_condition_met_id() {
        assert_eq!(CONDITION_MET_ID, 0x010F);
    }
}
