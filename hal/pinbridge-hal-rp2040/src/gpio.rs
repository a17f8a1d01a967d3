//! GPIO bank and edge detection
//!
//! Every exposed pin is driven through two `Flex` handles on the same pad.
//! The bank's handle does all configuration and level access from the main
//! loop. The watcher's handle only ever awaits edges, from a task on the
//! high-priority executor, and latches them into [`PendingEvents`].

use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{AnyPin, Flex, Level};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use pinbridge_core::PendingEvents;
use pinbridge_hal::GpioBank;

use crate::pins::{PinError, GPIO_COUNT};

/// Pins whose watcher should report edges
static EDGE_ENABLED: AtomicU32 = AtomicU32::new(0);

/// Wakes a watcher after its enable bit changed
static REARM: [Signal<CriticalSectionRawMutex, ()>; GPIO_COUNT] =
    [const { Signal::new() }; GPIO_COUNT];

fn edges_enabled(pin: u8) -> bool {
    EDGE_ENABLED.load(Ordering::Acquire) & (1 << pin) != 0
}

/// SIO-backed implementation of [`GpioBank`]
pub struct SioBank {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl Default for SioBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SioBank {
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Take over a pin as an input
    ///
    /// Returns the pin's edge watcher, which must be run for edge events on
    /// this pin to be reported.
    pub fn claim(&mut self, number: u8, pin: Peri<'static, AnyPin>) -> Result<EdgeWatcher, PinError> {
        let slot = self
            .pins
            .get_mut(number as usize)
            .ok_or(PinError::InvalidPin(number))?;

        // SAFETY: the watcher's handle never reconfigures the pad and neither
        // handle is ever dropped, so the two never undo each other's setup.
        let watch = unsafe { pin.clone_unchecked() };
        let watcher = EdgeWatcher {
            pin: Flex::new(watch),
            number,
        };

        let mut flex = Flex::new(pin);
        flex.set_as_input();
        *slot = Some(flex);
        Ok(watcher)
    }

    fn pin(&self, pin: u8) -> Option<&Flex<'static>> {
        self.pins.get(pin as usize)?.as_ref()
    }

    fn pin_mut(&mut self, pin: u8) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(pin as usize)?.as_mut()
    }
}

impl GpioBank for SioBank {
    fn level(&self, pin: u8) -> bool {
        self.pin(pin).is_some_and(|flex| flex.is_high())
    }

    fn output_level(&self, pin: u8) -> bool {
        self.pin(pin).is_some_and(|flex| flex.is_set_high())
    }

    fn set_level(&mut self, pin: u8, high: bool) {
        if let Some(flex) = self.pin_mut(pin) {
            flex.set_level(Level::from(high));
        }
    }

    fn set_output(&mut self, pin: u8, output: bool) {
        let Some(flex) = self.pin_mut(pin) else {
            return;
        };
        if output {
            flex.set_as_output();
        } else {
            flex.set_as_input();
        }
    }

    fn set_edge_events(&mut self, pin: u8, enabled: bool) {
        let Some(rearm) = REARM.get(pin as usize) else {
            return;
        };
        if enabled {
            EDGE_ENABLED.fetch_or(1 << pin, Ordering::AcqRel);
        } else {
            EDGE_ENABLED.fetch_and(!(1 << pin), Ordering::AcqRel);
        }
        rearm.signal(());
    }
}

/// Awaits edges on one pin
pub struct EdgeWatcher {
    pin: Flex<'static>,
    number: u8,
}

impl EdgeWatcher {
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Latch every edge into `pending` while edge events are enabled
    pub async fn run(mut self, pending: &'static PendingEvents) -> ! {
        let rearm = &REARM[self.number as usize];
        loop {
            if !edges_enabled(self.number) {
                rearm.wait().await;
                continue;
            }

            match select(self.pin.wait_for_any_edge(), rearm.wait()).await {
                Either::First(()) => {
                    if edges_enabled(self.number) {
                        pending.raise(self.number);
                    }
                }
                Either::Second(()) => {}
            }
        }
    }
}
