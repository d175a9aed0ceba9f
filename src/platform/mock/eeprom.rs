//! Mock EEPROM implementation for testing
//!
//! Provides in-memory EEPROM simulation for unit tests.

use crate::platform::{error::EepromError, traits::EepromInterface, Result};

/// EEPROM capacity (ATmega328)
pub const EEPROM_SIZE: usize = 1024;

/// Mock EEPROM implementation
///
/// Simulates a byte-addressable EEPROM in memory. Supports:
/// - Read/write with update (write-if-different) semantics
/// - Per-address physical write counts for wear leveling validation
/// - Corruption injection for testing recovery
/// - Power-loss simulation for crash-consistency testing
///
/// # Example
///
/// ```ignore
/// use rotary_hid::platform::mock::MockEeprom;
/// use rotary_hid::platform::traits::EepromInterface;
///
/// let mut eeprom = MockEeprom::new();
///
/// eeprom.write_word(0x000, 0x554B).unwrap();
/// assert_eq!(eeprom.read_word(0x000).unwrap(), 0x554B);
///
/// // Rewriting the same value costs no endurance
/// eeprom.write_word(0x000, 0x554B).unwrap();
/// assert_eq!(eeprom.write_count(0x000), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockEeprom<const N: usize = EEPROM_SIZE> {
    /// Cell contents
    storage: [u8; N],
    /// Physical writes per cell
    write_counts: [u32; N],
    /// Remaining `write_byte` calls before simulated power loss
    power_budget: Option<u32>,
}

impl MockEeprom {
    /// Create a blank 1 KB EEPROM (all cells 0xFF, as shipped from the factory)
    pub fn new() -> Self {
        Self::filled(0xFF)
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MockEeprom<N> {
    /// Addresses are `u16`, so the device cannot exceed 64 KiB
    const SIZE_FITS_ADDRESS: () = assert!(
        N <= u16::MAX as usize,
        "MockEeprom size exceeds the u16 address space"
    );

    /// Create an EEPROM with every cell set to `value`
    pub fn filled(value: u8) -> Self {
        Self::from_bytes([value; N])
    }

    /// Create an EEPROM with the given contents (e.g. a dump from a device)
    pub fn from_bytes(storage: [u8; N]) -> Self {
        let () = Self::SIZE_FITS_ADDRESS;
        Self {
            storage,
            write_counts: [0; N],
            power_budget: None,
        }
    }

    /// Get EEPROM contents (for test verification)
    pub fn contents(&self) -> &[u8; N] {
        &self.storage
    }

    /// Number of physical writes a cell has received
    pub fn write_count(&self, address: u16) -> u32 {
        self.write_counts[address as usize]
    }

    /// Total physical writes across all cells
    pub fn total_write_count(&self) -> u32 {
        self.write_counts.iter().sum()
    }

    /// Overwrite cells directly, bypassing write accounting
    pub fn inject_corruption(&mut self, address: u16, data: &[u8]) {
        let start = address as usize;
        self.storage[start..start + data.len()].copy_from_slice(data);
    }

    /// Simulate power loss after `writes` more `write_byte` calls
    ///
    /// Every later write is silently dropped until [`restore_power`](Self::restore_power).
    pub fn simulate_power_loss_after(&mut self, writes: u32) {
        self.power_budget = Some(writes);
    }

    /// Power the device back up
    pub fn restore_power(&mut self) {
        self.power_budget = None;
    }

    fn check_range(&self, address: u16, len: usize) -> Result<()> {
        if address as usize + len > N {
            return Err(EepromError::InvalidAddress.into());
        }
        Ok(())
    }
}

impl<const N: usize> EepromInterface for MockEeprom<N> {
    fn read_byte(&mut self, address: u16) -> Result<u8> {
        self.check_range(address, 1)?;
        Ok(self.storage[address as usize])
    }

    fn read_block(&mut self, address: u16, buf: &mut [u8]) -> Result<()> {
        self.check_range(address, buf.len())?;
        let start = address as usize;
        buf.copy_from_slice(&self.storage[start..start + buf.len()]);
        Ok(())
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        self.check_range(address, 1)?;

        if let Some(budget) = self.power_budget.as_mut() {
            if *budget == 0 {
                return Ok(());
            }
            *budget -= 1;
        }

        // Update semantics: an unchanged cell is not rewritten
        let cell = &mut self.storage[address as usize];
        if *cell != value {
            *cell = value;
            self.write_counts[address as usize] += 1;
        }

        Ok(())
    }

    fn capacity(&self) -> u16 {
        let () = Self::SIZE_FITS_ADDRESS;
        N as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformError;

    #[test]
    fn test_mock_eeprom_blank() {
        let eeprom = MockEeprom::new();
        assert_eq!(eeprom.capacity(), 1024);
        assert!(eeprom.contents().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_mock_eeprom_read_write() {
        let mut eeprom = MockEeprom::new();

        eeprom.write_byte(0x010, 0x42).unwrap();
        assert_eq!(eeprom.read_byte(0x010).unwrap(), 0x42);

        let mut buf = [0u8; 3];
        eeprom.read_block(0x00F, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0x42, 0xFF]);
    }

    #[test]
    fn test_mock_eeprom_word_is_little_endian() {
        let mut eeprom = MockEeprom::new();

        eeprom.write_word(0x020, 0x554B).unwrap();
        assert_eq!(eeprom.read_byte(0x020).unwrap(), 0x4B);
        assert_eq!(eeprom.read_byte(0x021).unwrap(), 0x55);
        assert_eq!(eeprom.read_word(0x020).unwrap(), 0x554B);
    }

    #[test]
    fn test_mock_eeprom_update_semantics() {
        let mut eeprom = MockEeprom::new();

        eeprom.write_byte(0x000, 0x00).unwrap();
        eeprom.write_byte(0x000, 0x00).unwrap();
        eeprom.write_byte(0x000, 0x01).unwrap();

        assert_eq!(eeprom.write_count(0x000), 2);
        assert_eq!(eeprom.total_write_count(), 2);

        // Writing the erased value to a blank cell costs nothing
        eeprom.write_byte(0x001, 0xFF).unwrap();
        assert_eq!(eeprom.write_count(0x001), 0);
    }

    #[test]
    fn test_mock_eeprom_invalid_address() {
        let mut eeprom = MockEeprom::new();

        assert_eq!(
            eeprom.read_byte(1024),
            Err(PlatformError::Eeprom(EepromError::InvalidAddress))
        );
        assert!(eeprom.write_byte(1024, 0).is_err());

        let mut buf = [0u8; 4];
        assert!(eeprom.read_block(1022, &mut buf).is_err());
        assert!(eeprom.write_word(1023, 0).is_err());
    }

    #[test]
    fn test_mock_eeprom_power_loss() {
        let mut eeprom = MockEeprom::new();

        eeprom.simulate_power_loss_after(2);
        for addr in 0..4 {
            eeprom.write_byte(addr, 0x55).unwrap();
        }

        assert_eq!(&eeprom.contents()[..4], &[0x55, 0x55, 0xFF, 0xFF]);

        eeprom.restore_power();
        eeprom.write_byte(3, 0x55).unwrap();
        assert_eq!(eeprom.read_byte(3).unwrap(), 0x55);
    }

    #[test]
    fn test_mock_eeprom_capacity_follows_size() {
        let small: MockEeprom<16> = MockEeprom::filled(0x00);
        assert_eq!(small.capacity(), 16);

        assert_eq!(MockEeprom::new().capacity(), EEPROM_SIZE as u16);
    }

    #[test]
    fn test_mock_eeprom_inject_corruption() {
        let mut eeprom: MockEeprom<16> = MockEeprom::filled(0x00);

        eeprom.inject_corruption(4, &[0xAA, 0xAA]);

        assert_eq!(eeprom.read_word(4).unwrap(), 0xAAAA);
        assert_eq!(eeprom.total_write_count(), 0);
    }
}
