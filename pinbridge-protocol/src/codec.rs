//! Little-endian integer packing
//!
//! All multi-byte protocol fields are little-endian. The caller guarantees
//! the slice is long enough; a short slice is a programming error and panics.

/// Read a `u16` from the first two bytes of `buf`
#[inline]
pub fn get_u16(buf: &[u8]) -> u16 {
    u16::from_le_bytes([buf[0], buf[1]])
}

/// Read a `u32` from the first four bytes of `buf`
#[inline]
pub fn get_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

/// Write `value` into the first two bytes of `buf`
#[inline]
pub fn put_u16(buf: &mut [u8], value: u16) {
    buf[..2].copy_from_slice(&value.to_le_bytes());
}

/// Write `value` into the first four bytes of `buf`
#[inline]
pub fn put_u32(buf: &mut [u8], value: u32) {
    buf[..4].copy_from_slice(&value.to_le_bytes());
}
