//! Masking the edge-watch interrupt

use embassy_rp::interrupt::{self, InterruptExt};

use pinbridge_hal::InterruptGate;

/// Masks `SWI_IRQ_1`, which runs the high-priority executor hosting the
/// edge watchers
#[derive(Debug, Clone, Copy, Default)]
pub struct SwiGate;

impl InterruptGate for SwiGate {
    fn with_masked<R>(&self, f: impl FnOnce() -> R) -> R {
        let was_enabled = interrupt::SWI_IRQ_1.is_enabled();
        interrupt::SWI_IRQ_1.disable();
        let result = f();
        if was_enabled {
            // SAFETY: restores the state found on entry
            unsafe { interrupt::SWI_IRQ_1.enable() };
        }
        result
    }
}
