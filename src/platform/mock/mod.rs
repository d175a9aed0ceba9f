//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use rotary_hid::core::settings::SettingsStore;
//! use rotary_hid::platform::mock::MockEeprom;
//!
//! let store = SettingsStore::initialize(MockEeprom::new())?;
//! ```

#![cfg(any(test, feature = "mock"))]

mod eeprom;
mod gpio;

pub use eeprom::{MockEeprom, EEPROM_SIZE};
pub use gpio::MockGpio;
