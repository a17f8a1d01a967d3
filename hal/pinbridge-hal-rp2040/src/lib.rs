//! RP2040-specific HAL for the PinBridge firmware
//!
//! Implements the `pinbridge-hal` traits on `embassy-rp`:
//!
//! - [`gpio::SioBank`] and its per-pin edge watchers
//! - [`adc::RpAdc`] for the ADC channels
//! - [`i2c::HalI2c`] for I2C0
//! - [`irq::SwiGate`] for masking the edge-watch interrupt
//! - [`board`] for BOOTSEL, the ROM bootloader and the unique id
//!
//! Pins are handed around by number through [`pins::PinBank`].

#![no_std]

pub mod adc;
pub mod board;
pub mod gpio;
pub mod i2c;
pub mod irq;
pub mod pins;

pub use adc::{AdcPins, RpAdc};
pub use board::{unique_id, BootselButton, RomBootloader};
pub use gpio::{EdgeWatcher, SioBank};
pub use i2c::{HalI2c, I2cError, BUS_FREQUENCY};
pub use irq::SwiGate;
pub use pins::{PinBank, PinError};
