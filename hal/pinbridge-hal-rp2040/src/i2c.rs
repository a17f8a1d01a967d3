//! I2C bus adapter

use embedded_hal::i2c::I2c;

use pinbridge_hal::I2cBus;

/// Bus clock, standard mode
pub const BUS_FREQUENCY: u32 = 100_000;

/// Errors from the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// No acknowledge, arbitration loss or another bus fault
    Bus,
    /// The bus pins are exposed as GPIOs instead
    NotWired,
}

/// Drives any blocking `embedded-hal` I2C master, such as
/// `embassy_rp::i2c::I2c<'_, I2C0, Blocking>`
///
/// Boards that hand the I2C pins to the GPIO table build an
/// [`absent`](HalI2c::absent) adapter, which fails every transfer.
pub struct HalI2c<T> {
    bus: Option<T>,
}

impl<T: I2c> HalI2c<T> {
    pub fn new(bus: T) -> Self {
        Self { bus: Some(bus) }
    }

    pub fn absent() -> Self {
        Self { bus: None }
    }

    fn bus(&mut self) -> Result<&mut T, I2cError> {
        self.bus.as_mut().ok_or(I2cError::NotWired)
    }
}

impl<T: I2c> I2cBus for HalI2c<T> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        self.bus()?.write(address, data).map_err(|_| I2cError::Bus)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), I2cError> {
        self.bus()?.read(address, buf).map_err(|_| I2cError::Bus)
    }
}
