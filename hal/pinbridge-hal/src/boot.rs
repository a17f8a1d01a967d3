//! Bootloader entry

/// Hands the chip over to its resident bootloader
pub trait Bootloader {
    /// Reboot into the bootloader. Never returns.
    fn enter_bootloader(&mut self) -> !;
}
