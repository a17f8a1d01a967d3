//! Outbound transport abstraction

/// Device-to-host message transport
///
/// Flow control is a single binary signal: a frame may only be handed over
/// while nothing else is in flight.
pub trait Link {
    /// Error type for transmit operations
    type Error;

    /// True when no transmission is currently in flight
    fn is_idle(&self) -> bool;

    /// Hand one complete frame to the transport
    ///
    /// Callers check [`Link::is_idle`] first.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}
