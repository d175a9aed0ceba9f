//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod eeprom;
pub mod gpio;

// Re-export trait interfaces
pub use eeprom::EepromInterface;
pub use gpio::{GpioInterface, GpioMode};
