//! Bridge task
//!
//! Owns the [`Device`] and runs the main loop. Each iteration, in order:
//!
//! 1. Dispatch at most one inbound request, if there is room for its response
//! 2. Poll the event bridge, if there is room for an event
//! 3. Hand at most one queued frame to USB TX
//!
//! Iterations are paced by a 1 ms ticker or an inbound request, whichever
//! comes first.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};

use pinbridge_core::{Device, DeviceState};
use pinbridge_hal::Bootloader;
use pinbridge_hal_rp2040::{BootselButton, HalI2c, RomBootloader, RpAdc, SioBank, SwiGate};

use crate::channels::{INBOUND, PENDING};
use crate::usb::UsbLink;

/// The device as wired on this board
pub type BoardDevice = Device<SioBank, BootselButton, HalI2c<I2c<'static, I2C0, Blocking>>, RpAdc>;

/// Loop pacing when no request arrives
const TICK: Duration = Duration::from_millis(1);

#[embassy_executor::task]
pub async fn bridge_task(mut device: BoardDevice) -> ! {
    info!("Bridge task started");

    let gate = SwiGate;
    let mut link = UsbLink;
    let mut ticker = Ticker::every(TICK);

    loop {
        // Requests wait in INBOUND while the queue is full
        let request = if device.can_accept() {
            match select(INBOUND.receive(), ticker.next()).await {
                Either::First(request) => Some(request),
                Either::Second(()) => None,
            }
        } else {
            ticker.next().await;
            None
        };

        if let Some(request) = request {
            device.handle_inbound(&request);
        }

        if device.can_accept() && device.poll_events(&PENDING, &gate) == DeviceState::Bootloader {
            info!("Rebooting into the USB bootloader");
            RomBootloader.enter_bootloader();
        }

        device.drain_step(&mut link);
    }
}
