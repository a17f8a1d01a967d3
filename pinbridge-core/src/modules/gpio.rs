//! GPIO module (GPIO handle)
//!
//! Requests address logical pins. Most carry `[u16 pin][u8 value]`; the
//! reply echoes whichever of the two fields the request carried, with the
//! value replaced by the answer where there is one.

use pinbridge_hal::{GpioBank, InputPin};
use pinbridge_protocol::codec::{get_u16, put_u16};
use pinbridge_protocol::messages::{gpio, module_code};
use pinbridge_protocol::{Direction, EventType, Handle};

use crate::config::{PinSource, PinTable, MAX_PINS};
use crate::dispatch::{Module, ModuleError};
use crate::events::VirtualButton;

/// Host-visible configuration of one logical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState {
    pub direction: Direction,
    pub event: EventType,
    pub enabled: bool,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            direction: Direction::In,
            event: EventType::None,
            enabled: false,
        }
    }
}

/// Serves the GPIO handle
pub struct GpioModule<G, B> {
    bank: G,
    button: VirtualButton<B>,
    table: PinTable,
    states: [PinState; MAX_PINS],
}

impl<G: GpioBank, B: InputPin> GpioModule<G, B> {
    pub fn new(bank: G, button: VirtualButton<B>, table: PinTable) -> Self {
        Self {
            bank,
            button,
            table,
            states: [PinState::default(); MAX_PINS],
        }
    }

    pub fn pins(&self) -> &PinTable {
        &self.table
    }

    pub fn bank(&self) -> &G {
        &self.bank
    }

    pub fn button_mut(&mut self) -> &mut VirtualButton<B> {
        &mut self.button
    }

    /// Configuration of a logical pin
    pub fn state(&self, logical: u16) -> Option<&PinState> {
        self.table.source(logical)?;
        self.states.get(logical as usize)
    }

    fn lookup(&self, pin: Option<u16>) -> Result<(usize, PinSource), ModuleError> {
        let pin = pin.ok_or(ModuleError::InvalidPayload)?;
        let source = self.table.source(pin).ok_or(ModuleError::OutOfRange)?;
        Ok((pin as usize, source))
    }

    fn read_level(&self, source: PinSource) -> bool {
        match source {
            PinSource::Gpio(pin) => self.bank.level(pin),
            PinSource::Button => self.button.level(),
        }
    }
}

impl<G: GpioBank, B: InputPin> Module for GpioModule<G, B> {
    fn handle(&self) -> Handle {
        Handle::Gpio
    }

    fn execute(&mut self, id: u16, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError> {
        let code = module_code(id, gpio::MODULE_ID).ok_or(ModuleError::UnknownCommand)?;

        let mut pin = (input.len() >= 2).then(|| get_u16(input));
        let mut value = input.get(2).copied();

        match code {
            gpio::GET_PIN_COUNT => pin = Some(self.table.len() as u16),
            gpio::PIN_GET_VAL => {
                let (_, source) = self.lookup(pin)?;
                value = Some(self.read_level(source) as u8);
            }
            gpio::PIN_SET_OUT_VAL => {
                let (_, source) = self.lookup(pin)?;
                let level = value.ok_or(ModuleError::InvalidPayload)? != 0;
                match source {
                    PinSource::Gpio(physical) => self.bank.set_level(physical, level),
                    PinSource::Button => return Err(ModuleError::InvalidPayload),
                }
            }
            gpio::PIN_GET_OUT_VAL => {
                let (_, source) = self.lookup(pin)?;
                let level = match source {
                    PinSource::Gpio(physical) => self.bank.output_level(physical),
                    PinSource::Button => self.button.level(),
                };
                value = Some(level as u8);
            }
            gpio::PIN_ENABLE | gpio::PIN_DISABLE => {
                let (index, _) = self.lookup(pin)?;
                self.states[index].enabled = code == gpio::PIN_ENABLE;
            }
            gpio::PIN_SET_DIRECTION => {
                let (index, source) = self.lookup(pin)?;
                let direction = value
                    .and_then(Direction::from_byte)
                    .ok_or(ModuleError::InvalidPayload)?;
                match source {
                    PinSource::Gpio(physical) => {
                        self.bank.set_output(physical, direction == Direction::Out)
                    }
                    PinSource::Button if direction == Direction::In => {}
                    PinSource::Button => return Err(ModuleError::InvalidPayload),
                }
                self.states[index].direction = direction;
            }
            gpio::PIN_GET_DIRECTION => {
                let (index, _) = self.lookup(pin)?;
                value = Some(self.states[index].direction.to_byte());
            }
            gpio::PIN_SET_EVENT_CFG => {
                let (index, source) = self.lookup(pin)?;
                let event = value
                    .and_then(EventType::from_byte)
                    .filter(EventType::is_supported)
                    .ok_or(ModuleError::InvalidPayload)?;
                let enabled = event == EventType::Change;
                match source {
                    PinSource::Gpio(physical) => self.bank.set_edge_events(physical, enabled),
                    PinSource::Button => self.button.set_reporting(enabled),
                }
                self.states[index].event = event;
            }
            gpio::PIN_GET_EVENT_CFG => {
                let (index, _) = self.lookup(pin)?;
                value = Some(self.states[index].event.to_byte());
            }
            _ => return Err(ModuleError::UnknownCommand),
        }

        let mut len = 0;
        if let Some(pin) = pin {
            put_u16(&mut out[len..], pin);
            len += 2;
        }
        if let Some(value) = value {
            out[len] = value;
            len += 1;
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonMode;
    use crate::testing::{FakeBank, FakeButton, FakePins};
    use core::cell::Cell;
    use pinbridge_protocol::MAX_RESPONSE_PAYLOAD;

    const PINS: [u8; 5] = [2, 3, 4, 18, 25];

    fn module<'a>(pins: &'a FakePins, pressed: &'a Cell<bool>) -> GpioModule<FakeBank<'a>, FakeButton<'a>> {
        let table = PinTable::new(&PINS, ButtonMode::Report).unwrap();
        let button = VirtualButton::new(FakeButton(pressed), ButtonMode::Report);
        GpioModule::new(FakeBank(pins), button, table)
    }

    fn run<G: GpioBank, B: InputPin>(
        module: &mut GpioModule<G, B>,
        code: u8,
        input: &[u8],
    ) -> Result<heapless::Vec<u8, MAX_RESPONSE_PAYLOAD>, ModuleError> {
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];
        let len = module.execute(code as u16 | 0x0100, input, &mut out)?;
        Ok(heapless::Vec::from_slice(&out[..len]).unwrap())
    }

    #[test]
    fn test_pin_count_includes_button() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        assert_eq!(&run(&mut gpio, gpio::GET_PIN_COUNT, &[]).unwrap()[..], &[6, 0]);
    }

    #[test]
    fn test_bare_code_is_accepted() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);
        let mut out = [0u8; MAX_RESPONSE_PAYLOAD];

        assert_eq!(gpio.execute(0x0001, &[], &mut out), Ok(2));
        assert_eq!(gpio.execute(0x0301, &[], &mut out), Err(ModuleError::UnknownCommand));
    }

    #[test]
    fn test_get_val_reads_mapped_pin() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        pins.input[18].set(true);
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_VAL, &[3, 0]).unwrap()[..], &[3, 0, 1]);
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_VAL, &[2, 0]).unwrap()[..], &[2, 0, 0]);
    }

    #[test]
    fn test_output_roundtrip() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        run(&mut gpio, gpio::PIN_SET_DIRECTION, &[1, 0, 1]).unwrap();
        assert!(pins.output[3].get());

        assert_eq!(
            &run(&mut gpio, gpio::PIN_SET_OUT_VAL, &[1, 0, 7]).unwrap()[..],
            &[1, 0, 7]
        );
        assert!(pins.latch[3].get());
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_OUT_VAL, &[1, 0]).unwrap()[..], &[1, 0, 1]);
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_VAL, &[1, 0]).unwrap()[..], &[1, 0, 1]);
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_DIRECTION, &[1, 0]).unwrap()[..], &[1, 0, 1]);
    }

    #[test]
    fn test_set_out_val_requires_value() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        assert_eq!(run(&mut gpio, gpio::PIN_SET_OUT_VAL, &[1, 0]), Err(ModuleError::InvalidPayload));
        assert_eq!(run(&mut gpio, gpio::PIN_GET_VAL, &[1]), Err(ModuleError::InvalidPayload));
    }

    #[test]
    fn test_out_of_range_pin() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        for code in [
            gpio::PIN_GET_VAL,
            gpio::PIN_ENABLE,
            gpio::PIN_GET_DIRECTION,
            gpio::PIN_SET_EVENT_CFG,
        ] {
            assert_eq!(run(&mut gpio, code, &[6, 0, 0]), Err(ModuleError::OutOfRange));
        }
    }

    #[test]
    fn test_button_pin_is_input_only() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        assert_eq!(run(&mut gpio, gpio::PIN_SET_OUT_VAL, &[5, 0, 1]), Err(ModuleError::InvalidPayload));
        assert_eq!(run(&mut gpio, gpio::PIN_SET_DIRECTION, &[5, 0, 1]), Err(ModuleError::InvalidPayload));
        assert!(run(&mut gpio, gpio::PIN_SET_DIRECTION, &[5, 0, 0]).is_ok());
    }

    #[test]
    fn test_event_cfg_enables_edges() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        // [pin][type][period]
        run(&mut gpio, gpio::PIN_SET_EVENT_CFG, &[3, 0, 1, 0, 0]).unwrap();
        assert!(pins.edges[18].get());
        assert_eq!(&run(&mut gpio, gpio::PIN_GET_EVENT_CFG, &[3, 0]).unwrap()[..], &[3, 0, 1]);

        run(&mut gpio, gpio::PIN_SET_EVENT_CFG, &[3, 0, 0, 0, 0]).unwrap();
        assert!(!pins.edges[18].get());
    }

    #[test]
    fn test_event_cfg_rejects_unsupported_types() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        for kind in [0x02, 0x03, 0x11, 0x21, 0x07] {
            assert_eq!(
                run(&mut gpio, gpio::PIN_SET_EVENT_CFG, &[0, 0, kind]),
                Err(ModuleError::InvalidPayload)
            );
        }
        assert!(!pins.edges[2].get());
    }

    #[test]
    fn test_event_cfg_on_button_toggles_reporting() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        run(&mut gpio, gpio::PIN_SET_EVENT_CFG, &[5, 0, 1]).unwrap();
        assert!(gpio.button_mut().is_reporting());
        run(&mut gpio, gpio::PIN_SET_EVENT_CFG, &[5, 0, 0]).unwrap();
        assert!(!gpio.button_mut().is_reporting());
    }

    #[test]
    fn test_enable_is_recorded() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        assert!(!gpio.state(4).unwrap().enabled);
        run(&mut gpio, gpio::PIN_ENABLE, &[4, 0]).unwrap();
        assert!(gpio.state(4).unwrap().enabled);
        run(&mut gpio, gpio::PIN_DISABLE, &[4, 0]).unwrap();
        assert!(!gpio.state(4).unwrap().enabled);
        assert_eq!(gpio.state(9), None);
    }

    #[test]
    fn test_unsupported_commands_fail() {
        let pins = FakePins::new();
        let pressed = Cell::new(false);
        let mut gpio = module(&pins, &pressed);

        for code in [gpio::SET_DEBOUNCE, gpio::GET_DEBOUNCE, gpio::PORT_GET_VAL, 0x42] {
            assert_eq!(run(&mut gpio, code, &[0, 0, 0]), Err(ModuleError::UnknownCommand));
        }
    }
}
