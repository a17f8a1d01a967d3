//! Inter-task communication channels
//!
//! Static channels and signals for passing data between Embassy tasks.
//! All use CriticalSectionRawMutex for safe access from any context.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;
use portable_atomic::AtomicBool;

use pinbridge_core::PendingEvents;
use pinbridge_protocol::{MAX_FRAME_SIZE, MAX_REQUEST_SIZE};

/// One reassembled request from the host
pub type Request = Vec<u8, MAX_REQUEST_SIZE>;

/// One frame for the host
pub type Frame = Vec<u8, MAX_FRAME_SIZE>;

/// Requests from USB RX to the bridge
///
/// While this is full the RX task stops reading, so the host sees NAKs
/// instead of lost requests.
pub static INBOUND: Channel<CriticalSectionRawMutex, Request, 2> = Channel::new();

/// Frame handed from the bridge to USB TX
pub static OUTBOUND: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

/// Set from the moment a frame is handed to USB TX until it is on the wire
pub static TX_BUSY: AtomicBool = AtomicBool::new(false);

/// Edges latched by the edge watchers
pub static PENDING: PendingEvents = PendingEvents::new();
