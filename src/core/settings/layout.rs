//! EEPROM ring layout
//!
//! The device is split into a data area of equally sized slots followed by a
//! status ring holding one byte per slot:
//!
//! ```text
//! 0                                  status_base                 capacity
//! ├──────┬──────┬─────┬──────────────┼────┬────┬─────┬───────────┤
//! │slot 0│slot 1│ ... │slot count-1  │ s0 │ s1 │ ... │ s count-1 │
//! └──────┴──────┴─────┴──────────────┴────┴────┴─────┴───────────┘
//! ```
//!
//! A slot is one byte wider than the record it stores; the trailing byte is
//! reserved and never touched.
//!
//! The slot count is chosen so that slots and status bytes never share an
//! address: `count = capacity / (slot_size + 1)`. The historical formula
//! `capacity / slot_size` (see [`RingLayout::legacy`]) lets the last slots run
//! into the status ring, and writing them corrupts the ring.

use super::record::{REGISTER_COUNT, REGISTER_WIDTH};
use crate::platform::{PlatformError, Result};

/// Slot and status-ring geometry derived from the device capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingLayout {
    slot_size: u16,
    slot_count: u16,
    status_base: u16,
}

impl RingLayout {
    /// Compute the layout for a device of `capacity` bytes holding records of
    /// `registers` 16-bit fields
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the device cannot hold a single
    /// slot plus its status byte.
    pub fn new(capacity: u16, registers: u16) -> Result<Self> {
        let slot_size = Self::slot_size_for(registers)?;
        let slot_count = capacity / (slot_size + 1);

        if slot_count == 0 {
            return Err(PlatformError::InvalidConfig);
        }

        Ok(Self {
            slot_size,
            slot_count,
            status_base: capacity - slot_count,
        })
    }

    /// Geometry from the older `count = capacity / slot_size` arithmetic
    ///
    /// Useful for inspecting dumps of devices written that way; the store
    /// refuses layouts that [overlap the status ring](Self::overlaps_status).
    pub fn legacy(capacity: u16, registers: u16) -> Result<Self> {
        let slot_size = Self::slot_size_for(registers)?;
        let slot_count = capacity / slot_size;

        if slot_count == 0 {
            return Err(PlatformError::InvalidConfig);
        }

        Ok(Self {
            slot_size,
            slot_count,
            status_base: capacity - slot_count,
        })
    }

    fn slot_size_for(registers: u16) -> Result<u16> {
        if registers == 0 || registers > 0x7F {
            return Err(PlatformError::InvalidConfig);
        }
        Ok((registers * REGISTER_WIDTH) | 1)
    }

    /// Layout for the settings record on a device of `capacity` bytes
    pub fn for_settings(capacity: u16) -> Result<Self> {
        Self::new(capacity, REGISTER_COUNT as u16)
    }

    /// Bytes per slot, including the reserved byte
    pub fn slot_size(&self) -> u16 {
        self.slot_size
    }

    /// Number of slots (and status bytes)
    pub fn slot_count(&self) -> u16 {
        self.slot_count
    }

    /// Address of the first status byte
    pub fn status_base(&self) -> u16 {
        self.status_base
    }

    /// Address of the first byte of `slot`
    pub fn slot_address(&self, slot: u16) -> u16 {
        slot * self.slot_size
    }

    /// Address of register `register` inside `slot`
    pub fn register_address(&self, slot: u16, register: u8) -> u16 {
        self.slot_address(slot) + register as u16 * REGISTER_WIDTH
    }

    /// Address of the status byte for `slot`
    pub fn status_address(&self, slot: u16) -> u16 {
        self.status_base + slot
    }

    /// Whether the data area runs into the status ring
    pub fn overlaps_status(&self) -> bool {
        self.slot_count as u32 * self.slot_size as u32 > self.status_base as u32
    }

    /// Slot preceding `slot` in ring order
    pub fn previous(&self, slot: u16) -> u16 {
        if slot == 0 {
            self.slot_count - 1
        } else {
            slot - 1
        }
    }
}
