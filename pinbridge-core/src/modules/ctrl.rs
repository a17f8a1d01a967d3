//! Device identity (CTRL handle)

use pinbridge_protocol::codec::{get_u32, put_u32};
use pinbridge_protocol::messages::{ctrl, module_code};
use pinbridge_protocol::Handle;

use crate::dispatch::{Module, ModuleError};

/// Derive the reported serial number from the board's unique id
pub fn serial_from_unique_id(uid: &[u8; 8]) -> u32 {
    get_u32(uid)
}

/// Answers version and serial number queries
#[derive(Debug, Clone, Copy)]
pub struct CtrlModule {
    hardware_id: u32,
    serial: u32,
}

impl CtrlModule {
    pub fn new(serial: u32) -> Self {
        Self {
            hardware_id: ctrl::HW_ID,
            serial,
        }
    }
}

impl Module for CtrlModule {
    fn handle(&self) -> Handle {
        Handle::Ctrl
    }

    fn execute(&mut self, id: u16, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError> {
        if !input.is_empty() {
            return Err(ModuleError::InvalidPayload);
        }

        let value = match module_code(id, ctrl::MODULE_ID) {
            Some(ctrl::GET_DEVICE_VER) => self.hardware_id,
            Some(ctrl::GET_DEVICE_SN) => self.serial,
            _ => return Err(ModuleError::UnknownCommand),
        };

        put_u32(out, value);
        Ok(4)
    }
}
