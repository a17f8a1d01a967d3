//! I2C master module (I2C handle)
//!
//! One port. Transfers carry a fixed 9-byte prefix:
//! ```text
//! 0: u8  port          always 0
//! 1: u8  address       7-bit
//! 2: u8  mem_addr_len  always 0
//! 3: u32 mem_addr      always 0
//! 7: u16 buf_len
//! 9: [u8; buf_len]     WRITE only
//! ```

use pinbridge_hal::I2cBus;
use pinbridge_protocol::codec::{get_u16, get_u32, put_u16};
use pinbridge_protocol::messages::{i2c, module_code};
use pinbridge_protocol::Handle;

use crate::dispatch::{Module, ModuleError};

const TRANSFER_HEADER: usize = 9;

/// Serves the I2C handle
pub struct I2cModule<I> {
    bus: I,
    /// The bus pins are wired to the controller
    available: bool,
    enabled: bool,
}

impl<I: I2cBus> I2cModule<I> {
    /// # Arguments
    /// * `bus` - The bus to drive
    /// * `available` - False when the bus pins are exposed as GPIOs instead
    pub fn new(bus: I, available: bool) -> Self {
        Self {
            bus,
            available,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn transfer(&mut self, code: u8, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError> {
        if !self.enabled {
            return Err(ModuleError::Disabled);
        }
        if input.len() < TRANSFER_HEADER {
            return Err(ModuleError::InvalidPayload);
        }

        let address = input[1];
        let mem_addr_len = input[2];
        let mem_addr = get_u32(&input[3..]);
        let buf_len = get_u16(&input[7..]) as usize;

        if address > i2c::MAX_ADDRESS {
            return Err(ModuleError::OutOfRange);
        }
        if mem_addr_len != 0 || mem_addr != 0 {
            return Err(ModuleError::InvalidPayload);
        }
        // Writes are bounded by the handler capacity, reads by the
        // [u16 count][data] reply that has to fit in it
        let limit = if code == i2c::WRITE {
            out.len()
        } else {
            out.len().saturating_sub(2)
        };
        if buf_len > limit {
            return Err(ModuleError::InvalidPayload);
        }

        if code == i2c::WRITE {
            let data = input
                .get(TRANSFER_HEADER..TRANSFER_HEADER + buf_len)
                .ok_or(ModuleError::InvalidPayload)?;
            self.bus.write(address, data).map_err(|_| ModuleError::Hardware)?;
            trace!("i2c wrote {=usize} bytes to {=u8:#x}", buf_len, address);
            Ok(0)
        } else {
            self.bus
                .read(address, &mut out[2..2 + buf_len])
                .map_err(|_| ModuleError::Hardware)?;
            put_u16(out, buf_len as u16);
            trace!("i2c read {=usize} bytes from {=u8:#x}", buf_len, address);
            Ok(2 + buf_len)
        }
    }
}

impl<I: I2cBus> Module for I2cModule<I> {
    fn handle(&self) -> Handle {
        Handle::I2c
    }

    fn execute(&mut self, id: u16, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError> {
        if !self.available {
            return Err(ModuleError::Disabled);
        }
        let code = module_code(id, i2c::MODULE_ID).ok_or(ModuleError::UnknownCommand)?;

        match input.first() {
            Some(0) => {}
            Some(_) => return Err(ModuleError::OutOfRange),
            None => return Err(ModuleError::InvalidPayload),
        }

        match code {
            i2c::ENABLE | i2c::DISABLE => {
                self.enabled = code == i2c::ENABLE;
                Ok(0)
            }
            i2c::IS_ENABLED => {
                out[0] = self.enabled as u8;
                Ok(1)
            }
            i2c::WRITE | i2c::READ => self.transfer(code, input, out),
            _ => Err(ModuleError::UnknownCommand),
        }
    }
}
