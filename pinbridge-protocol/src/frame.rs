//! Header encoding and request validation for the DLN-2 protocol.
//!
//! Frame format:
//! - SIZE (u16): total frame length including this header
//! - ID (u16): command id, `code | (module << 8)`
//! - ECHO (u16): opaque correlation token, copied into the response
//! - HANDLE (u16): peripheral module the frame targets
//! - PAYLOAD: command-specific data; responses start with a `u16` status

use heapless::Vec;

use crate::codec::{get_u16, put_u16};

/// Size of the fixed message header
pub const HEADER_SIZE: usize = 8;

/// Size of the status word prepended to response payloads
pub const STATUS_SIZE: usize = 2;

/// Largest frame the device transmits (one full-speed bulk packet)
pub const MAX_FRAME_SIZE: usize = 64;

/// Output capacity granted to a module handler
pub const MAX_RESPONSE_PAYLOAD: usize = MAX_FRAME_SIZE - HEADER_SIZE - STATUS_SIZE;

/// Largest request reassembled from the host
///
/// The longest request a module accepts is an I2C write filling the handler
/// capacity: 8 header + 9 transfer prefix + 54 data = 71 bytes. Longer
/// requests the host driver may send are still collected whole so they fail
/// with one FAILED response instead of desynchronizing the stream.
pub const MAX_REQUEST_SIZE: usize = 288;

/// USB bulk packet size used to detect the end of a transfer
const PACKET_SIZE: usize = 64;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer bytes than a header
    TooShort,
    /// Declared size disagrees with the received length
    SizeMismatch,
    /// Payload does not fit the frame
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Response status word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    Failed,
}

const STATUS_OK: u16 = 0x0000;
const STATUS_FAILED: u16 = 0xFFFF;

impl Status {
    /// Wire value of this status
    pub fn to_u16(self) -> u16 {
        match self {
            Status::Ok => STATUS_OK,
            Status::Failed => STATUS_FAILED,
        }
    }

    /// Parse a status word. The host treats anything non-zero as failure.
    pub fn from_u16(value: u16) -> Self {
        if value == STATUS_OK {
            Status::Ok
        } else {
            Status::Failed
        }
    }
}

/// The fixed 8-byte message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    pub size: u16,
    pub id: u16,
    pub echo: u16,
    pub handle: u16,
}

impl Header {
    /// Decode a header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() < HEADER_SIZE {
            return Err(FrameError::TooShort);
        }
        Ok(Self {
            size: get_u16(&buf[0..]),
            id: get_u16(&buf[2..]),
            echo: get_u16(&buf[4..]),
            handle: get_u16(&buf[6..]),
        })
    }

    /// Encode this header into the start of `buf`
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        if buf.len() < HEADER_SIZE {
            return Err(FrameError::BufferTooSmall);
        }
        put_u16(&mut buf[0..], self.size);
        put_u16(&mut buf[2..], self.id);
        put_u16(&mut buf[4..], self.echo);
        put_u16(&mut buf[6..], self.handle);
        Ok(HEADER_SIZE)
    }
}

/// A validated request borrowed from a receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub header: Header,
    pub payload: &'a [u8],
}

impl<'a> Request<'a> {
    /// Parse a complete request
    ///
    /// Rejects frames shorter than a header and frames whose declared size
    /// does not match the number of bytes actually received.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, FrameError> {
        let header = Header::decode(bytes)?;
        if header.size as usize != bytes.len() {
            return Err(FrameError::SizeMismatch);
        }
        Ok(Self {
            header,
            payload: &bytes[HEADER_SIZE..],
        })
    }
}

/// Encode a complete message into `buf`
///
/// Returns the encoded frame size.
pub fn encode_message(
    buf: &mut [u8],
    id: u16,
    echo: u16,
    handle: u16,
    payload: &[u8],
) -> Result<usize, FrameError> {
    let size = HEADER_SIZE + payload.len();
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    if buf.len() < size {
        return Err(FrameError::BufferTooSmall);
    }

    let header = Header {
        size: size as u16,
        id,
        echo,
        handle,
    };
    header.encode(buf)?;
    buf[HEADER_SIZE..size].copy_from_slice(payload);
    Ok(size)
}

/// Encode a response to `request` into `buf`
///
/// The id, echo and handle are copied from the request; the size is
/// recomputed to cover the status word and `payload`.
pub fn encode_response(
    buf: &mut [u8],
    request: &Header,
    status: Status,
    payload: &[u8],
) -> Result<usize, FrameError> {
    let size = HEADER_SIZE + STATUS_SIZE + payload.len();
    if size > MAX_FRAME_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    if buf.len() < size {
        return Err(FrameError::BufferTooSmall);
    }

    let header = Header {
        size: size as u16,
        ..*request
    };
    header.encode(buf)?;
    put_u16(&mut buf[HEADER_SIZE..], status.to_u16());
    buf[HEADER_SIZE + STATUS_SIZE..size].copy_from_slice(payload);
    Ok(size)
}

/// Reassembles requests that span several USB packets
///
/// A request is complete once the declared size has been received or the
/// host ends the transfer with a short packet.
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    state: AssembleState,
    buffer: Vec<u8, MAX_REQUEST_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Collecting packets of the current transfer
    Collecting,
    /// Dropping the rest of an oversized transfer
    Discarding,
}

impl Default for RequestAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestAssembler {
    /// Create a new assembler
    pub fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the assembler state
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Feed one USB packet
    ///
    /// Returns `Ok(Some(request))` when a request is complete, `Ok(None)`
    /// when more packets are needed, or `Err` when the transfer is larger
    /// than [`MAX_REQUEST_SIZE`].
    pub fn feed(&mut self, packet: &[u8]) -> Result<Option<Vec<u8, MAX_REQUEST_SIZE>>, FrameError> {
        let short = packet.len() < PACKET_SIZE;

        if self.state == AssembleState::Discarding {
            if short {
                self.reset();
            }
            return Ok(None);
        }

        if self.buffer.extend_from_slice(packet).is_err() {
            self.buffer.clear();
            self.state = if short {
                AssembleState::Collecting
            } else {
                AssembleState::Discarding
            };
            return Err(FrameError::PayloadTooLarge);
        }

        let declared_reached =
            self.buffer.len() >= 2 && self.buffer.len() >= get_u16(&self.buffer) as usize;
        if declared_reached || short {
            let request = self.buffer.clone();
            self.reset();
            return Ok(Some(request));
        }

        Ok(None)
    }
}
