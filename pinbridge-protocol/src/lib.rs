//! DLN-2 Wire Protocol
//!
//! This crate defines the message format spoken over the vendor-class USB
//! interface. It mirrors the protocol of the Diolan DLN-2 adapter so that the
//! stock host drivers (`dln2`, `gpio-dln2`, `i2c-dln2`, `dln2-adc`) bind to
//! the board without modification.
//!
//! # Protocol Overview
//!
//! Every message starts with the same little-endian header:
//! ```text
//! ┌──────┬────────────┬──────┬────────┬─────────────┐
//! │ SIZE │ COMMAND ID │ ECHO │ HANDLE │ PAYLOAD     │
//! │ u16  │ u16        │ u16  │ u16    │ 0..N bytes  │
//! └──────┴────────────┴──────┴────────┴─────────────┘
//! ```
//!
//! Responses reuse the request header and prepend a `u16` status to the
//! result payload. Unsolicited events travel on the EVENT handle with a zero
//! echo.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod events;
pub mod frame;
pub mod messages;

pub use events::{PinEvent, CONDITION_MET_ID, EVENT_PAYLOAD_SIZE};
pub use frame::{
    encode_message, encode_response, FrameError, Header, Request, RequestAssembler, Status,
    HEADER_SIZE, MAX_FRAME_SIZE, MAX_REQUEST_SIZE, MAX_RESPONSE_PAYLOAD, STATUS_SIZE,
};
pub use messages::{command, module_code, Direction, EventType, Handle};
