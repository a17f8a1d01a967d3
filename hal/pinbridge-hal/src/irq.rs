//! Interrupt source masking

/// Masks the single interrupt source that latches GPIO edges
///
/// The closure runs with that source disabled; everything else keeps
/// running. Keep the closure short.
pub trait InterruptGate {
    fn with_masked<R>(&self, f: impl FnOnce() -> R) -> R;
}
