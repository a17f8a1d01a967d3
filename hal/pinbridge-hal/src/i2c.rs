//! I2C master seam
//!
//! The I2C module forwards host transfers as plain writes and reads. The
//! host never asks for a register address phase, so there is no combined
//! write-then-read.

/// Blocking I2C master
///
/// Both operations return only after the stop condition, so the caller's
/// buffers are free again on return.
pub trait I2cBus {
    /// Error type for bus transfers
    type Error;

    /// Send `data` to the 7-bit `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from the 7-bit `address`
    ///
    /// On error the contents of `buf` are unspecified.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}
