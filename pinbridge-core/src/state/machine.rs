//! State machine definition

use super::events::DeviceEvent;

/// Device states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Serving host requests and reporting events
    #[default]
    Running,
    /// About to reboot into the ROM bootloader
    Bootloader,
}

impl DeviceState {
    /// Check if this state accepts no further work
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeviceState::Bootloader)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: DeviceEvent) -> Self {
        use DeviceEvent::*;
        use DeviceState::*;

        match (self, event) {
            (Running, ButtonPressed) => Bootloader,

            // Bootloader is terminal
            (Bootloader, _) => Bootloader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        assert_eq!(DeviceState::default(), DeviceState::Running);
        assert!(!DeviceState::Running.is_terminal());
    }

    #[test]
    fn test_press_enters_bootloader() {
        let next = DeviceState::Running.transition(DeviceEvent::ButtonPressed);
        assert_eq!(next, DeviceState::Bootloader);
        assert!(next.is_terminal());
    }

    #[test]
    fn test_bootloader_is_terminal() {
        let next = DeviceState::Bootloader.transition(DeviceEvent::ButtonPressed);
        assert_eq!(next, DeviceState::Bootloader);
    }
}
