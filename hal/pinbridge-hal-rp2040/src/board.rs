//! Board identity, the BOOTSEL button and the ROM bootloader

use embassy_rp::bootsel::is_bootsel_pressed;
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::{BOOTSEL, FLASH};
use embassy_rp::Peri;

use pinbridge_hal::{Bootloader, InputPin};

/// Size of the on-board flash
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Read the 64-bit unique id of the flash chip
pub fn unique_id(flash: Peri<'static, FLASH>) -> Option<[u8; 8]> {
    let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(flash);
    let mut uid = [0u8; 8];
    flash.blocking_unique_id(&mut uid).ok()?;
    Some(uid)
}

/// The BOOTSEL button, sampled through the flash chip select
pub struct BootselButton {
    bootsel: Peri<'static, BOOTSEL>,
}

impl BootselButton {
    pub fn new(bootsel: Peri<'static, BOOTSEL>) -> Self {
        Self { bootsel }
    }
}

impl InputPin for BootselButton {
    fn is_high(&mut self) -> bool {
        is_bootsel_pressed(self.bootsel.reborrow())
    }
}

/// Reboots into the mask ROM USB bootloader
#[derive(Debug, Clone, Copy, Default)]
pub struct RomBootloader;

impl Bootloader for RomBootloader {
    fn enter_bootloader(&mut self) -> ! {
        embassy_rp::rom_data::reset_to_usb_boot(0, 0);
        loop {
            cortex_m::asm::nop();
        }
    }
}
