//! GPIO event bridge
//!
//! Edges are latched per physical pin by the interrupt side and turned into
//! unsolicited event frames by the main loop, one per iteration. The board
//! button has no interrupt; it is sampled and debounced on each poll that
//! finds no latched edge.

use portable_atomic::{AtomicU32, Ordering};

use pinbridge_hal::{GpioBank, InputPin, InterruptGate};
use pinbridge_protocol::PinEvent;

use crate::config::ButtonMode;
use crate::modules::GpioModule;

/// Consecutive identical samples needed to accept a new button level
pub const DEBOUNCE_SAMPLES: u8 = 5;

/// One pending flag per physical pin
///
/// The interrupt side only ever sets bits. The main loop clears them inside
/// an [`InterruptGate`] window, so the two never race on a bit.
pub struct PendingEvents {
    bits: AtomicU32,
}

impl Default for PendingEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingEvents {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Latch an edge on `pin`. Safe to call from interrupt context.
    pub fn raise(&self, pin: u8) {
        if pin < 32 {
            self.bits.fetch_or(1 << pin, Ordering::Release);
        }
    }

    /// True when no edge is latched
    pub fn is_empty(&self) -> bool {
        self.bits.load(Ordering::Acquire) == 0
    }

    /// Clear and return the lowest latched pin
    pub fn take_first<G: InterruptGate>(&self, gate: &G) -> Option<u8> {
        gate.with_masked(|| {
            let bits = self.bits.load(Ordering::Acquire);
            if bits == 0 {
                return None;
            }
            let pin = bits.trailing_zeros();
            self.bits.fetch_and(!(1 << pin), Ordering::AcqRel);
            Some(pin as u8)
        })
    }
}

/// Counter-based debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    stable: bool,
    count: u8,
}

impl Debouncer {
    pub const fn new(initial: bool) -> Self {
        Self {
            stable: initial,
            count: 0,
        }
    }

    /// Feed one raw sample and return the debounced level
    pub fn update(&mut self, sample: bool) -> bool {
        if sample == self.stable {
            self.count = 0;
        } else {
            self.count += 1;
            if self.count >= DEBOUNCE_SAMPLES {
                self.stable = sample;
                self.count = 0;
            }
        }
        self.stable
    }

    pub fn level(&self) -> bool {
        self.stable
    }
}

/// A debounced button level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    /// New level, to be reported as a pin event
    Changed(bool),
    /// Press while in bootloader mode
    Pressed,
}

/// The board button presented as a pin
pub struct VirtualButton<B> {
    pin: B,
    debouncer: Debouncer,
    last: bool,
    reporting: bool,
    mode: ButtonMode,
}

impl<B: InputPin> VirtualButton<B> {
    /// Wrap a button input. The button starts out released.
    pub fn new(pin: B, mode: ButtonMode) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(false),
            last: false,
            reporting: false,
            mode,
        }
    }

    /// Last debounced level
    pub fn level(&self) -> bool {
        self.last
    }

    /// Enable or disable edge reporting
    pub fn set_reporting(&mut self, enabled: bool) {
        self.reporting = enabled;
    }

    pub fn is_reporting(&self) -> bool {
        self.reporting
    }

    /// Take one sample
    ///
    /// The last-known level always follows the debounced level; whether a
    /// change is surfaced depends on the mode and the reporting flag.
    pub fn sample(&mut self) -> Option<ButtonEdge> {
        let level = self.debouncer.update(self.pin.is_high());
        if level == self.last {
            return None;
        }
        self.last = level;

        match self.mode {
            ButtonMode::Report if self.reporting => Some(ButtonEdge::Changed(level)),
            ButtonMode::Report => None,
            ButtonMode::Bootloader if level => Some(ButtonEdge::Pressed),
            ButtonMode::Bootloader => None,
        }
    }
}

/// Something the bridge wants the device to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent {
    /// Send an unsolicited pin event
    Pin(PinEvent),
    /// The button was pressed in bootloader mode
    ButtonPressed,
}

/// Produce at most one event
///
/// Latched edges take priority. The level is sampled now, not at interrupt
/// time, so a burst of edges collapses into one event with the settled level.
pub fn poll_event<G, B, T>(
    pending: &PendingEvents,
    gate: &T,
    gpio: &mut GpioModule<G, B>,
) -> Option<BridgeEvent>
where
    G: GpioBank,
    B: InputPin,
    T: InterruptGate,
{
    if let Some(physical) = pending.take_first(gate) {
        let Some(logical) = gpio.pins().logical(physical) else {
            warn!("edge on unmapped GPIO {=u8}", physical);
            return None;
        };
        let level = gpio.bank().level(physical);
        trace!("pin {=u16} (GPIO {=u8}) changed to {=bool}", logical, physical, level);
        return Some(BridgeEvent::Pin(PinEvent::new(logical, level)));
    }

    match gpio.button_mut().sample()? {
        ButtonEdge::Changed(level) => {
            let logical = gpio.pins().button_index()?;
            trace!("button changed to {=bool}", level);
            Some(BridgeEvent::Pin(PinEvent::new(logical, level)))
        }
        ButtonEdge::Pressed => Some(BridgeEvent::ButtonPressed),
    }
}
