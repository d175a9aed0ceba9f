//! Wear-leveled EEPROM settings store
//!
//! Every change to a setting writes a complete record (a *generation*) into the
//! next slot of a ring of slots spread over the whole EEPROM. A parallel status
//! ring of one byte per slot records which slot was written last:
//!
//! - Each commit sets `status[slot] = status[slot - 1] + 1 (mod 256)`.
//! - Scanning the ring, the first index whose byte does not continue that
//!   sequence is the next slot to write; the slot before it holds the newest
//!   generation.
//!
//! Record data is written before the status byte, so a power loss mid-commit
//! leaves the ring pointing at the previous complete generation. Recovery
//! accepts a slot only if its magic and version words match.
//!
//! # Example
//!
//! ```ignore
//! use rotary_hid::core::settings::{Input, SettingsStore};
//! use rotary_hid::platform::mock::MockEeprom;
//!
//! let mut store = SettingsStore::initialize(MockEeprom::new())?;
//! store.set_keycode(Input::Clockwise.register(), 0xE9)?;
//!
//! // Power cycle
//! let mut store = SettingsStore::initialize(store.into_inner())?;
//! assert_eq!(store.keycode(Input::Clockwise.register()), 0xE9);
//! ```

use super::layout::RingLayout;
use super::record::{
    key_of, modifiers_of, with_key, with_modifiers, FieldKind, Input, KeyBinding, Modifiers,
    OutputSelector, OutputType, DEFAULT_REGISTERS, INPUT_COUNT, MAGIC, REGISTER_COUNT,
    REGISTER_MAGIC, REGISTER_OUTPUT, REGISTER_VERSION, VERSION,
};
use crate::platform::{EepromInterface, PlatformError, Result};

/// Diagnostic counters for wear and recovery monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreStats {
    /// Generations committed since initialization
    pub commits: u32,
    /// Slot written by the most recent commit
    pub last_slot: Option<u16>,
    /// Slot the settings were recovered from at boot
    pub recovered_slot: Option<u16>,
    /// Recoveries that found no valid generation and kept defaults
    pub default_fallbacks: u32,
    /// Setter calls ignored because the register was out of range
    pub rejected_fields: u32,
}

/// Settings store over an EEPROM device
///
/// Owns the RAM copy of the settings registers, the ring layout and the device.
pub struct SettingsStore<E: EepromInterface> {
    eeprom: E,
    layout: RingLayout,
    registers: [u16; REGISTER_COUNT],
    stats: StoreStats,
}

impl<E: EepromInterface> SettingsStore<E> {
    /// Take ownership of the EEPROM and load the newest valid generation
    ///
    /// Falls back to the compiled-in defaults when the device is blank, holds
    /// foreign data or an incompatible record version. Never writes.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the device is too small for one
    /// slot, or the device error if a read fails.
    pub fn initialize(eeprom: E) -> Result<Self> {
        let layout = RingLayout::for_settings(eeprom.capacity())?;
        Self::with_layout(eeprom, layout)
    }

    /// Like [`initialize`](Self::initialize) with an explicit layout
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the layout does not fit the
    /// device or its slots run into the status ring.
    pub fn with_layout(eeprom: E, layout: RingLayout) -> Result<Self> {
        let ring_end = layout.status_base() as u32 + layout.slot_count() as u32;
        if layout.overlaps_status() || ring_end > eeprom.capacity() as u32 {
            crate::log_error!(
                "Settings layout does not fit EEPROM of {} bytes",
                eeprom.capacity()
            );
            return Err(PlatformError::InvalidConfig);
        }

        let mut store = Self {
            eeprom,
            layout,
            registers: DEFAULT_REGISTERS,
            stats: StoreStats::default(),
        };
        store.recover()?;
        Ok(store)
    }

    /// Index of the slot the next commit will write
    ///
    /// The first status byte that is not its predecessor plus one. If the whole
    /// ring is consistent (only possible when the slot count is a multiple of
    /// 256) slot 0 is used.
    pub fn find_next_write_index(&mut self) -> Result<u16> {
        let layout = self.layout;
        let mut prev = self
            .eeprom
            .read_byte(layout.status_address(layout.previous(0)))?;

        for slot in 0..layout.slot_count() {
            let current = self.eeprom.read_byte(layout.status_address(slot))?;
            if current != prev.wrapping_add(1) {
                return Ok(slot);
            }
            prev = current;
        }

        Ok(0)
    }

    /// Reload the RAM registers from the newest generation
    ///
    /// Returns `true` if a valid generation was found. Otherwise the RAM
    /// registers are left untouched.
    pub fn recover(&mut self) -> Result<bool> {
        let next = self.find_next_write_index()?;
        let candidate = self.layout.previous(next);

        let magic = self
            .eeprom
            .read_word(self.layout.register_address(candidate, REGISTER_MAGIC))?;
        let version = self
            .eeprom
            .read_word(self.layout.register_address(candidate, REGISTER_VERSION))?;

        if magic != MAGIC || version != VERSION {
            self.stats.default_fallbacks += 1;
            crate::log_warn!(
                "No valid settings in slot {} (magic {}, version {}), using defaults",
                candidate,
                magic,
                version
            );
            return Ok(false);
        }

        let mut registers = [0u16; REGISTER_COUNT];
        for (register, value) in registers.iter_mut().enumerate() {
            *value = self
                .eeprom
                .read_word(self.layout.register_address(candidate, register as u8))?;
        }

        self.registers = registers;
        self.stats.recovered_slot = Some(candidate);
        crate::log_info!("Loaded settings from slot {}", candidate);
        Ok(true)
    }

    /// Write the RAM registers as a new generation
    ///
    /// Data registers go first, the status byte last.
    pub fn commit(&mut self) -> Result<()> {
        let layout = self.layout;
        let slot = self.find_next_write_index()?;

        for (register, &value) in self.registers.iter().enumerate() {
            self.eeprom
                .write_word(layout.register_address(slot, register as u8), value)?;
        }

        let prev = self
            .eeprom
            .read_byte(layout.status_address(layout.previous(slot)))?;
        self.eeprom
            .write_byte(layout.status_address(slot), prev.wrapping_add(1))?;

        self.stats.commits += 1;
        self.stats.last_slot = Some(slot);
        crate::log_debug!("Committed settings to slot {}", slot);
        Ok(())
    }

    /// Reset the status ring to a fresh sequence
    ///
    /// Writes `0, 1, 2, ...` into the ring so the next commit lands in slot 0,
    /// invalidates the slot recovery would read, and restores the defaults in
    /// RAM. After a reboot the defaults are in effect.
    pub fn format(&mut self) -> Result<()> {
        let layout = self.layout;
        let last = layout.slot_count() - 1;

        self.eeprom
            .write_word(layout.register_address(last, REGISTER_MAGIC), 0xFFFF)?;
        for slot in 0..layout.slot_count() {
            self.eeprom
                .write_byte(layout.status_address(slot), slot as u8)?;
        }

        self.registers = DEFAULT_REGISTERS;
        crate::log_info!("Formatted settings ring ({} slots)", layout.slot_count());
        Ok(())
    }

    /// Restore the compiled-in defaults and commit them
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.registers = DEFAULT_REGISTERS;
        self.commit()
    }

    /// Read one field of a binding register
    ///
    /// Returns 0 for registers that are not bindings (magic, version, output or
    /// out of range).
    pub fn get_field(&self, kind: FieldKind, register: u8) -> u8 {
        match Input::from_register(register) {
            Some(input) => self.field(kind, input),
            None => {
                crate::log_debug!("Read of invalid settings register {}", register);
                0
            }
        }
    }

    /// Change one field of a binding register and commit
    ///
    /// Writes to registers that are not bindings are ignored without error.
    pub fn set_field(&mut self, kind: FieldKind, register: u8, value: u8) -> Result<()> {
        match Input::from_register(register) {
            Some(input) => self.update_field(kind, input, value),
            None => {
                self.stats.rejected_fields += 1;
                crate::log_warn!("Ignoring write to invalid settings register {}", register);
                Ok(())
            }
        }
    }

    /// Read one field of an input's binding
    pub fn field(&self, kind: FieldKind, input: Input) -> u8 {
        let word = self.registers[input.register() as usize];
        match kind {
            FieldKind::KeyCode => key_of(word),
            FieldKind::Modifiers => modifiers_of(word),
            FieldKind::OutputType => self.output_selector().get(input).bits(),
        }
    }

    /// Change one field of an input's binding and commit
    ///
    /// Only the bits of the targeted field change; output types are masked to
    /// two bits.
    pub fn update_field(&mut self, kind: FieldKind, input: Input, value: u8) -> Result<()> {
        let index = input.register() as usize;
        match kind {
            FieldKind::KeyCode => self.registers[index] = with_key(self.registers[index], value),
            FieldKind::Modifiers => {
                self.registers[index] = with_modifiers(self.registers[index], value)
            }
            FieldKind::OutputType => {
                let mut selector = self.output_selector();
                selector.set(input, OutputType::from_bits(value));
                self.registers[REGISTER_OUTPUT as usize] = selector.pack();
            }
        }
        self.commit()
    }

    /// Key code of a binding register (0 if out of range)
    pub fn keycode(&self, register: u8) -> u8 {
        self.get_field(FieldKind::KeyCode, register)
    }

    /// Set the key code of a binding register and commit
    pub fn set_keycode(&mut self, register: u8, keycode: u8) -> Result<()> {
        self.set_field(FieldKind::KeyCode, register, keycode)
    }

    /// Modifier mask of a binding register (0 if out of range)
    pub fn modifiers(&self, register: u8) -> u8 {
        self.get_field(FieldKind::Modifiers, register)
    }

    /// Set the modifier mask of a binding register and commit
    pub fn set_modifiers(&mut self, register: u8, modifiers: u8) -> Result<()> {
        self.set_field(FieldKind::Modifiers, register, modifiers)
    }

    /// Output type of a binding register ([`OutputType::Keyboard`] if out of range)
    pub fn output_type(&self, register: u8) -> OutputType {
        OutputType::from_bits(self.get_field(FieldKind::OutputType, register))
    }

    /// Set the output type of a binding register and commit
    pub fn set_output_type(&mut self, register: u8, output: OutputType) -> Result<()> {
        self.set_field(FieldKind::OutputType, register, output.bits())
    }

    /// Complete binding of one input
    pub fn binding(&self, input: Input) -> KeyBinding {
        KeyBinding {
            key: self.field(FieldKind::KeyCode, input),
            modifiers: Modifiers::from_bits_retain(self.field(FieldKind::Modifiers, input)),
            output: self.output_selector().get(input),
        }
    }

    /// Bindings of all inputs in register order
    pub fn bindings(&self) -> [KeyBinding; INPUT_COUNT] {
        Input::ALL.map(|input| self.binding(input))
    }

    fn output_selector(&self) -> OutputSelector {
        OutputSelector::unpack(self.registers[REGISTER_OUTPUT as usize])
    }

    /// Raw RAM registers
    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.registers
    }

    /// Ring geometry in use
    pub fn layout(&self) -> RingLayout {
        self.layout
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Get EEPROM reference (for testing)
    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// Release the EEPROM, e.g. to re-initialize after a simulated power cycle
    pub fn into_inner(self) -> E {
        self.eeprom
    }
}
