//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the keypad's two peripherals:
//! the settings EEPROM and the encoder input pins.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{EepromInterface, GpioInterface, GpioMode};
