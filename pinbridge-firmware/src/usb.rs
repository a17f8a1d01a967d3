//! USB vendor interface
//!
//! A single vendor-class interface with one bulk OUT and one bulk IN
//! endpoint, which is what the host `dln2` driver binds to.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::driver::EndpointAddress;
use embassy_usb::types::StringIndex;
use embassy_usb::{Builder, Config as UsbConfig, Handler, UsbDevice};
use portable_atomic::Ordering;
use static_cell::StaticCell;

use pinbridge_hal::Link;

use crate::channels::{Frame, OUTBOUND, TX_BUSY};
use crate::config::{USB_INTERFACE, USB_MANUFACTURER, USB_PID, USB_PRODUCT, USB_VID};

pub type UsbDriver = Driver<'static, USB>;
pub type BulkOut = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointOut;
pub type BulkIn = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;

/// Full-speed bulk packet size, which is also the largest outbound frame
pub const PACKET_SIZE: u16 = 64;

const VENDOR_CLASS: u8 = 0xFF;
const EP_OUT: u8 = 0x01;
const EP_IN: u8 = 0x82;

// Descriptor buffers (must live forever)
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static INTERFACE_NAME: StaticCell<InterfaceName> = StaticCell::new();
static SERIAL: StaticCell<heapless::String<16>> = StaticCell::new();

/// The built device and its two bulk endpoints
pub struct UsbParts {
    pub device: UsbDevice<'static, UsbDriver>,
    pub bulk_out: BulkOut,
    pub bulk_in: BulkIn,
}

/// Answers the string descriptor request for the interface name
struct InterfaceName {
    index: StringIndex,
    name: &'static str,
}

impl Handler for InterfaceName {
    fn get_string(&mut self, index: StringIndex, _lang_id: u16) -> Option<&str> {
        (index == self.index).then_some(self.name)
    }
}

/// Upper-case hex rendering of the flash unique id, used as the USB serial
pub fn serial_string(uid: &[u8; 8]) -> heapless::String<16> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    uid.iter()
        .flat_map(|byte| [HEX[(byte >> 4) as usize], HEX[(byte & 0x0F) as usize]])
        .map(char::from)
        .collect()
}

/// Describe the vendor interface and build the USB device
pub fn build(driver: UsbDriver, uid: &[u8; 8]) -> UsbParts {
    let serial = SERIAL.init(serial_string(uid));

    let mut config = UsbConfig::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(serial.as_str());
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );

    let name = builder.string();
    let (bulk_out, bulk_in) = {
        let mut function = builder.function(VENDOR_CLASS, 0, 0);
        let mut interface = function.interface();
        let mut alt = interface.alt_setting(VENDOR_CLASS, 0, 0, Some(name));
        let bulk_out = alt.endpoint_bulk_out(Some(EndpointAddress::from(EP_OUT)), PACKET_SIZE);
        let bulk_in = alt.endpoint_bulk_in(Some(EndpointAddress::from(EP_IN)), PACKET_SIZE);
        (bulk_out, bulk_in)
    };

    builder.handler(INTERFACE_NAME.init(InterfaceName {
        index: name,
        name: USB_INTERFACE,
    }));

    UsbParts {
        device: builder.build(),
        bulk_out,
        bulk_in,
    }
}

/// Errors from handing a frame to USB TX
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum LinkError {
    /// A frame is still in flight
    Busy,
    /// Frame longer than one packet
    FrameTooLarge,
}

/// [`Link`] over the bulk IN endpoint
///
/// Idle means the TX task has put the previous frame on the wire.
#[derive(Debug, Default)]
pub struct UsbLink;

impl Link for UsbLink {
    type Error = LinkError;

    fn is_idle(&self) -> bool {
        !TX_BUSY.load(Ordering::Acquire)
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        let frame = Frame::from_slice(frame).map_err(|_| LinkError::FrameTooLarge)?;
        if TX_BUSY.swap(true, Ordering::AcqRel) {
            return Err(LinkError::Busy);
        }
        OUTBOUND.signal(frame);
        Ok(())
    }
}
