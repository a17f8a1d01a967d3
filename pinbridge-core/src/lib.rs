//! Board-agnostic protocol core for the PinBridge firmware
//!
//! This crate contains all logic that does not depend on a specific chip:
//!
//! - Outbound message queue with link flow control
//! - Request dispatch by handle
//! - CTRL, GPIO, I2C and ADC module handlers
//! - GPIO event bridge and button debouncing
//! - Device lifecycle state machine
//! - Configuration types
//!
//! Hardware is reached only through the `pinbridge-hal` traits, so the whole
//! crate runs under `cargo test` on the host.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod device;
pub mod dispatch;
pub mod events;
pub mod modules;
pub mod queue;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ButtonMode, ConfigError, DeviceConfig};
pub use device::{Device, Modules};
pub use dispatch::{Dispatch, Module, ModuleError, ModuleSet};
pub use events::{PendingEvents, VirtualButton};
pub use queue::{DrainOutcome, OutboundQueue, QueueError, QUEUE_SLOTS};
pub use state::{DeviceEvent, DeviceState};
