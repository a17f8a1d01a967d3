//! Request dispatch
//!
//! Validates inbound frames, routes them by handle to a peripheral module
//! and queues the response. Every inbound frame ends in exactly one of:
//! silence (framing error), a FAILED response, or an OK response.

use pinbridge_protocol::{Handle, Request, Status, MAX_RESPONSE_PAYLOAD};

use crate::queue::{OutboundQueue, QueueError};

/// Reasons a module rejects a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleError {
    /// Command id not handled by this module
    UnknownCommand,
    /// Payload has the wrong length or a malformed field
    InvalidPayload,
    /// Addressed pin, channel, port or device does not exist
    OutOfRange,
    /// The module or resource is not enabled
    Disabled,
    /// The hardware transaction failed
    Hardware,
}

/// A peripheral module reachable through one handle
pub trait Module {
    /// Handle this module answers on
    fn handle(&self) -> Handle;

    /// Execute one command
    ///
    /// Writes the result payload into `out` and returns its length. `out`
    /// is exactly the output capacity; writing past it panics, which is a
    /// programming error rather than a protocol outcome.
    ///
    /// # Arguments
    /// * `id` - Full command id from the request header
    /// * `input` - Request payload
    /// * `out` - Response payload buffer
    fn execute(&mut self, id: u16, input: &[u8], out: &mut [u8]) -> Result<usize, ModuleError>;
}

/// A collection of modules addressable by handle
pub trait ModuleSet {
    /// Find the module serving `handle`
    fn route(&mut self, handle: Handle) -> Option<&mut dyn Module>;
}

/// What became of an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Framing error, nothing queued
    Dropped,
    /// A response with this status was queued
    Responded(Status),
    /// The response could not be queued
    QueueFull,
}

/// Handle one complete inbound frame
pub fn handle_inbound<S, const N: usize>(
    modules: &mut S,
    queue: &mut OutboundQueue<N>,
    bytes: &[u8],
) -> Dispatch
where
    S: ModuleSet + ?Sized,
{
    let request = match Request::parse(bytes) {
        Ok(request) => request,
        Err(e) => {
            debug!("dropping {=usize} byte frame: {}", bytes.len(), e);
            return Dispatch::Dropped;
        }
    };
    let header = request.header;

    trace!(
        "request handle={=u16} id={=u16:#x} echo={=u16} len={=usize}",
        header.handle,
        header.id,
        header.echo,
        request.payload.len()
    );

    let mut out = [0u8; MAX_RESPONSE_PAYLOAD];
    let result = match Handle::from_u16(header.handle).and_then(|h| modules.route(h)) {
        Some(module) => module.execute(header.id, request.payload, &mut out),
        None => {
            warn!("no module on handle {=u16}", header.handle);
            Err(ModuleError::UnknownCommand)
        }
    };

    let (status, payload) = match result {
        Ok(len) => (Status::Ok, &out[..len]),
        Err(e) => {
            debug!("handle {=u16} command {=u16:#x} failed: {}", header.handle, header.id, e);
            (Status::Failed, &out[..0])
        }
    };

    match queue.enqueue_response(&header, status, payload) {
        Ok(()) => Dispatch::Responded(status),
        Err(QueueError::Full) => {
            warn!("outbound queue full, response to echo {=u16} lost", header.echo);
            Dispatch::QueueFull
        }
        Err(QueueError::PayloadTooLarge) => {
            unreachable!("handler output is bounded by MAX_RESPONSE_PAYLOAD")
        }
    }
}
