//! USB transport tasks
//!
//! RX reassembles requests from bulk OUT packets and queues them for the
//! bridge. TX puts one frame at a time on bulk IN and then clears the busy
//! flag the bridge polls as its link idle signal.

use defmt::*;
use embassy_usb::driver::{Endpoint, EndpointError, EndpointIn, EndpointOut};
use embassy_usb::UsbDevice;
use portable_atomic::Ordering;

use pinbridge_protocol::RequestAssembler;

use crate::channels::{INBOUND, OUTBOUND, TX_BUSY};
use crate::usb::{BulkIn, BulkOut, UsbDriver, PACKET_SIZE};

#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB task started");
    device.run().await
}

#[embassy_executor::task]
pub async fn usb_rx_task(mut bulk_out: BulkOut) -> ! {
    info!("USB RX task started");

    let mut assembler = RequestAssembler::new();
    let mut packet = [0u8; PACKET_SIZE as usize];

    loop {
        bulk_out.wait_enabled().await;
        assembler.reset();
        info!("USB configured");

        loop {
            let len = match bulk_out.read(&mut packet).await {
                Ok(len) => len,
                Err(EndpointError::Disabled) => break,
                Err(e) => {
                    warn!("USB read failed: {}", e);
                    assembler.reset();
                    continue;
                }
            };

            match assembler.feed(&packet[..len]) {
                Ok(Some(request)) => INBOUND.send(request).await,
                Ok(None) => {}
                Err(e) => debug!("Dropping oversized request: {}", e),
            }
        }

        info!("USB disconnected");
    }
}

#[embassy_executor::task]
pub async fn usb_tx_task(mut bulk_in: BulkIn) -> ! {
    info!("USB TX task started");

    loop {
        let frame = OUTBOUND.wait().await;

        // A frame filling a whole packet is terminated by a zero-length packet
        if let Err(e) = bulk_in.write_transfer(&frame, true).await {
            warn!("USB write failed, frame dropped: {}", e);
        }

        TX_BUSY.store(false, Ordering::Release);
    }
}
