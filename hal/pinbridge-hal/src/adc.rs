//! Analog input abstractions

/// Single-shot ADC sampler
pub trait AdcReader {
    /// Error type for conversions
    type Error;

    /// Take one raw sample from a hardware channel
    ///
    /// # Arguments
    /// * `channel` - Hardware channel index
    fn read_raw(&mut self, channel: u8) -> Result<u16, Self::Error>;
}
