//! Mock GPIO implementation for testing

use crate::platform::{
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO input pin
///
/// Tracks the simulated line level and the configured mode.
#[derive(Debug, Clone)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
}

impl MockGpio {
    /// Create a new mock input with pull-up (idle line reads high)
    pub fn new_pull_up() -> Self {
        Self {
            state: true,
            mode: GpioMode::InputPullUp,
        }
    }

    /// Create a new floating mock input (reads low)
    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
        }
    }

    /// Set the input state (for simulating input pin reads)
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }
}

impl GpioInterface for MockGpio {
    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_input() {
        let mut gpio = MockGpio::new_input();
        assert!(!gpio.read());

        // Simulate external signal
        gpio.set_input_state(true);
        assert!(gpio.read());
    }

    #[test]
    fn test_mock_gpio_pull_up_idles_high() {
        let gpio = MockGpio::new_pull_up();
        assert!(gpio.read());
        assert_eq!(gpio.mode(), GpioMode::InputPullUp);
    }

    #[test]
    fn test_mock_gpio_set_mode() {
        let mut gpio = MockGpio::new_input();
        gpio.set_mode(GpioMode::InputPullUp).unwrap();
        assert_eq!(gpio.mode(), GpioMode::InputPullUp);
    }
}
