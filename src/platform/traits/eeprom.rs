//! EEPROM interface trait
//!
//! This module defines the byte-addressable non-volatile memory interface that
//! platform implementations must provide. It is the only path to durable
//! storage used by the settings store.

use crate::platform::{error::EepromError, Result};

/// EEPROM interface trait
///
/// # EEPROM Characteristics
///
/// - Byte addressable, no erase step (unlike Flash)
/// - Each cell has a finite write endurance (~100k cycles on AVR parts)
/// - No wear leveling or atomicity provided by the medium itself
/// - Operations are blocking; a byte write may stall the caller for ~3.4 ms
///
/// # Safety Invariants
///
/// - Only one owner per EEPROM instance (no concurrent access)
/// - Interrupts that touch the same device must be masked during a settings commit
///
/// # Memory Layout (ATmega328, 1 KB)
///
/// ```text
/// [Settings slots]   0x000 - 0x3B4 (73 slots x 13 bytes)
/// [Unused]           0x3B5 - 0x3B6
/// [Status ring]      0x3B7 - 0x3FF (73 bytes)
/// ```
pub trait EepromInterface {
    /// Read a single byte
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::InvalidAddress)` if `address`
    /// is outside the device.
    fn read_byte(&mut self, address: u16) -> Result<u8>;

    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::InvalidAddress)` if the range
    /// does not fit in the device.
    fn read_block(&mut self, address: u16, buf: &mut [u8]) -> Result<()>;

    /// Write a single byte
    ///
    /// Implementations may skip the physical write when the cell already holds
    /// `value` (AVR `eeprom_update_byte` semantics).
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::InvalidAddress)` if `address`
    /// is outside the device, `EepromError::WriteFailed` if the write did not
    /// complete.
    fn write_byte(&mut self, address: u16, value: u8) -> Result<()>;

    /// Total capacity in bytes
    fn capacity(&self) -> u16;

    /// Read a little-endian 16-bit word
    fn read_word(&mut self, address: u16) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_block(address, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Write a little-endian 16-bit word, low byte first
    fn write_word(&mut self, address: u16, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        let next = address
            .checked_add(1)
            .ok_or(EepromError::InvalidAddress)?;
        self.write_byte(address, lo)?;
        self.write_byte(next, hi)
    }
}
