//! GPIO pin abstractions
//!
//! Pins are addressed by their physical number. The core owns the mapping
//! from logical pin indices to these numbers.

/// A bank of general purpose pins
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait GpioBank {
    /// Current input level of a pin
    fn level(&self, pin: u8) -> bool;

    /// Level the output latch is driving
    fn output_level(&self, pin: u8) -> bool;

    /// Drive the output latch
    fn set_level(&mut self, pin: u8, high: bool);

    /// Switch a pin between input and output
    fn set_output(&mut self, pin: u8, output: bool);

    /// Enable or disable edge detection on both edges
    ///
    /// Detected edges are latched by the implementation's interrupt
    /// handler; see `pinbridge_core::events::PendingEvents`.
    fn set_edge_events(&mut self, pin: u8, enabled: bool);
}

/// Digital input pin
///
/// Sampling may need exclusive hardware access; the RP2040 BOOTSEL line
/// shares the flash chip select.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;
}
