//! Device context
//!
//! Everything the main loop owns: the modules, the outbound queue and the
//! lifecycle state. The interrupt side never sees this; it only touches a
//! [`PendingEvents`].

use pinbridge_hal::{AdcReader, GpioBank, I2cBus, InputPin, InterruptGate, Link};
use pinbridge_protocol::{Handle, CONDITION_MET_ID};

use crate::config::DeviceConfig;
use crate::dispatch::{self, Dispatch, Module, ModuleSet};
use crate::events::{poll_event, BridgeEvent, PendingEvents, VirtualButton};
use crate::modules::{AdcModule, CtrlModule, GpioModule, I2cModule};
use crate::queue::{DrainOutcome, OutboundQueue, QUEUE_SLOTS};
use crate::state::{DeviceEvent, DeviceState};

/// The four modules behind the CTRL, GPIO, I2C and ADC handles
pub struct Modules<G, B, I, A> {
    pub ctrl: CtrlModule,
    pub gpio: GpioModule<G, B>,
    pub i2c: I2cModule<I>,
    pub adc: AdcModule<A>,
}

impl<G, B, I, A> ModuleSet for Modules<G, B, I, A>
where
    G: GpioBank,
    B: InputPin,
    I: I2cBus,
    A: AdcReader,
{
    fn route(&mut self, handle: Handle) -> Option<&mut dyn Module> {
        let modules: [&mut dyn Module; 4] =
            [&mut self.ctrl, &mut self.gpio, &mut self.i2c, &mut self.adc];
        modules.into_iter().find(|module| module.handle() == handle)
    }
}

/// Protocol engine for one board
pub struct Device<G, B, I, A, const N: usize = QUEUE_SLOTS> {
    modules: Modules<G, B, I, A>,
    queue: OutboundQueue<N>,
    state: DeviceState,
}

impl<G, B, I, A, const N: usize> Device<G, B, I, A, N>
where
    G: GpioBank,
    B: InputPin,
    I: I2cBus,
    A: AdcReader,
{
    /// Assemble a device from its configuration and hardware
    pub fn new(config: DeviceConfig, bank: G, button: B, i2c: I, adc: A) -> Self {
        let button = VirtualButton::new(button, config.button_mode);
        Self {
            modules: Modules {
                ctrl: CtrlModule::new(config.serial),
                gpio: GpioModule::new(bank, button, config.pins),
                i2c: I2cModule::new(i2c, config.i2c_available),
                adc: AdcModule::new(adc, config.adc),
            },
            queue: OutboundQueue::new(),
            state: DeviceState::Running,
        }
    }

    /// Dispatch one complete inbound request
    pub fn handle_inbound(&mut self, bytes: &[u8]) -> Dispatch {
        dispatch::handle_inbound(&mut self.modules, &mut self.queue, bytes)
    }

    /// True when there is room to produce another frame
    ///
    /// Inbound requests and events are only serviced while this holds, so
    /// the queue never has to drop anything it was handed.
    pub fn can_accept(&self) -> bool {
        !self.state.is_terminal() && self.queue.free_slots() > 0
    }

    /// Run the event bridge once and queue whatever it produced
    pub fn poll_events<T: InterruptGate>(&mut self, pending: &PendingEvents, gate: &T) -> DeviceState {
        match poll_event(pending, gate, &mut self.modules.gpio) {
            Some(BridgeEvent::Pin(event)) => {
                let result = self.queue.enqueue(
                    CONDITION_MET_ID,
                    0,
                    Handle::Event.to_u16(),
                    &event.to_bytes(),
                );
                if let Err(e) = result {
                    warn!("event for pin {=u16} lost: {}", event.pin, e);
                }
            }
            Some(BridgeEvent::ButtonPressed) => {
                self.state = self.state.transition(DeviceEvent::ButtonPressed);
                info!("button pressed, entering bootloader");
            }
            None => {}
        }
        self.state
    }

    /// Hand at most one queued frame to the link
    pub fn drain_step<L: Link>(&mut self, link: &mut L) -> DrainOutcome {
        self.queue.drain_step(link)
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn queue(&self) -> &OutboundQueue<N> {
        &self.queue
    }
}
