//! Peripheral modules
//!
//! One module per protocol handle. Each implements
//! [`Module`](crate::dispatch::Module) and owns the hardware it drives.

pub mod adc;
pub mod ctrl;
pub mod gpio;
pub mod i2c;

pub use adc::AdcModule;
pub use ctrl::CtrlModule;
pub use gpio::{GpioModule, PinState};
pub use i2c::I2cModule;
