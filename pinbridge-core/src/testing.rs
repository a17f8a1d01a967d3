//! Host-side fakes of the HAL traits

use core::cell::Cell;

use pinbridge_hal::{AdcReader, GpioBank, I2cBus, InputPin, InterruptGate, Link};
use pinbridge_protocol::MAX_FRAME_SIZE;

use crate::config::NUM_GPIOS;

/// Shared pin state behind a [`FakeBank`]
pub struct FakePins {
    /// Level driven onto each pin from outside
    pub input: [Cell<bool>; NUM_GPIOS],
    pub latch: [Cell<bool>; NUM_GPIOS],
    pub output: [Cell<bool>; NUM_GPIOS],
    pub edges: [Cell<bool>; NUM_GPIOS],
}

impl FakePins {
    pub fn new() -> Self {
        Self {
            input: core::array::from_fn(|_| Cell::new(false)),
            latch: core::array::from_fn(|_| Cell::new(false)),
            output: core::array::from_fn(|_| Cell::new(false)),
            edges: core::array::from_fn(|_| Cell::new(false)),
        }
    }
}

pub struct FakeBank<'a>(pub &'a FakePins);

impl GpioBank for FakeBank<'_> {
    fn level(&self, pin: u8) -> bool {
        let pin = pin as usize;
        if self.0.output[pin].get() {
            self.0.latch[pin].get()
        } else {
            self.0.input[pin].get()
        }
    }

    fn output_level(&self, pin: u8) -> bool {
        self.0.latch[pin as usize].get()
    }

    fn set_level(&mut self, pin: u8, high: bool) {
        self.0.latch[pin as usize].set(high);
    }

    fn set_output(&mut self, pin: u8, output: bool) {
        self.0.output[pin as usize].set(output);
    }

    fn set_edge_events(&mut self, pin: u8, enabled: bool) {
        self.0.edges[pin as usize].set(enabled);
    }
}

pub struct FakeButton<'a>(pub &'a Cell<bool>);

impl InputPin for FakeButton<'_> {
    fn is_high(&mut self) -> bool {
        self.0.get()
    }
}

/// What a [`FakeI2c`] was asked to do
pub struct I2cLog {
    pub calls: Cell<usize>,
    pub last_address: Cell<u8>,
    pub fail: Cell<bool>,
}

impl I2cLog {
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
            last_address: Cell::new(0),
            fail: Cell::new(false),
        }
    }

    fn record(&self, address: u8) -> Result<(), ()> {
        self.calls.set(self.calls.get() + 1);
        self.last_address.set(address);
        if self.fail.get() {
            Err(())
        } else {
            Ok(())
        }
    }
}

/// Bus that accepts every write and reads back 0xA5
pub struct FakeI2c<'a> {
    log: &'a I2cLog,
}

impl<'a> FakeI2c<'a> {
    pub fn new(log: &'a I2cLog) -> Self {
        Self { log }
    }
}

impl I2cBus for FakeI2c<'_> {
    type Error = ();

    fn write(&mut self, address: u8, _data: &[u8]) -> Result<(), ()> {
        self.log.record(address)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ()> {
        self.log.record(address)?;
        buf.fill(0xA5);
        Ok(())
    }
}

/// Fixed raw sample per hardware channel
pub struct FakeAdc {
    pub raw: [u16; 5],
    pub fail: bool,
}

impl FakeAdc {
    pub fn new() -> Self {
        Self {
            raw: [0; 5],
            fail: false,
        }
    }
}

impl AdcReader for FakeAdc {
    type Error = ();

    fn read_raw(&mut self, channel: u8) -> Result<u16, ()> {
        if self.fail {
            return Err(());
        }
        self.raw.get(channel as usize).copied().ok_or(())
    }
}

/// Link that records every frame it is handed
pub struct FakeLink {
    pub idle: bool,
    pub fail: bool,
    pub sent: heapless::Vec<heapless::Vec<u8, MAX_FRAME_SIZE>, 32>,
}

impl FakeLink {
    pub fn new() -> Self {
        Self {
            idle: true,
            fail: false,
            sent: heapless::Vec::new(),
        }
    }
}

impl Link for FakeLink {
    type Error = ();

    fn is_idle(&self) -> bool {
        self.idle
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        let frame = heapless::Vec::from_slice(frame).map_err(|_| ())?;
        self.sent.push(frame).map_err(|_| ())
    }
}

/// Gate with nothing to mask; counts how often it was entered
pub struct NoGate {
    pub masked: Cell<usize>,
}

impl NoGate {
    pub fn new() -> Self {
        Self {
            masked: Cell::new(0),
        }
    }
}

impl InterruptGate for NoGate {
    fn with_masked<R>(&self, f: impl FnOnce() -> R) -> R {
        self.masked.set(self.masked.get() + 1);
        f()
    }
}
