//! Device lifecycle state machine
//!
//! The bridge has one job until the button asks it to stop: serve requests.
//! The state machine is explicit so the main loop can tell when to hand the
//! chip to the bootloader.

pub mod events;
pub mod machine;

pub use events::DeviceEvent;
pub use machine::DeviceState;
