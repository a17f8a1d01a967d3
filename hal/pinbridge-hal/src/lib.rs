//! PinBridge Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the protocol core talks through.
//! Chip-specific HALs implement them; host tests implement them with fakes.
//!
//! # Layering
//!
//! ```text
//!   pinbridge-firmware     USB transport, tasks, board wiring
//!          │
//!   pinbridge-core         dispatch, modules, queue, event bridge
//!          │
//!   pinbridge-hal          these traits
//!          │
//!   pinbridge-hal-rp2040   embassy-rp implementations
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioBank`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`adc::AdcReader`] - Analog sampling
//! - [`link::Link`] - Outbound transport
//! - [`irq::InterruptGate`] - Masking the edge interrupt source
//! - [`boot::Bootloader`] - One-way jump to the ROM bootloader

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod boot;
pub mod gpio;
pub mod i2c;
pub mod irq;
pub mod link;

pub use adc::AdcReader;
pub use boot::Bootloader;
pub use gpio::{GpioBank, InputPin};
pub use i2c::I2cBus;
pub use irq::InterruptGate;
pub use link::Link;
