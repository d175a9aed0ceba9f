//! Settings record format
//!
//! One settings generation is a fixed array of 16-bit registers:
//!
//! ```text
//! ┌───────┬─────────┬──────────┬──────────┬──────────┬────────────┐
//! │ MAGIC │ VERSION │   CCW    │    CW    │   BTN    │   OUTPUT   │
//! │0x554B │ 0x0002  │ mod│key  │ mod│key  │ mod│key  │ --bb aacc  │
//! └───────┴─────────┴──────────┴──────────┴──────────┴────────────┘
//!   reg 0    reg 1     reg 2      reg 3      reg 4       reg 5
//! ```
//!
//! Key registers hold the HID key code in the low byte and the modifier mask in
//! the high byte. The output register packs one 2-bit [`OutputType`] per input.

use bitflags::bitflags;

/// Magic word identifying a settings record ("UK")
pub const MAGIC: u16 = 0x554B;

/// Record layout version
pub const VERSION: u16 = 0x0002;

/// Register index of the magic word
pub const REGISTER_MAGIC: u8 = 0;
/// Register index of the layout version
pub const REGISTER_VERSION: u8 = 1;
/// Register index of the counter-clockwise binding
pub const REGISTER_CCW: u8 = 2;
/// Register index of the clockwise binding
pub const REGISTER_CW: u8 = 3;
/// Register index of the button binding
pub const REGISTER_BTN: u8 = 4;
/// Register index of the packed output types
pub const REGISTER_OUTPUT: u8 = 5;

/// Number of 16-bit registers in a record
pub const REGISTER_COUNT: usize = 6;

/// Width of one register in bytes
pub const REGISTER_WIDTH: u16 = 2;

/// Number of logical inputs with a key binding
pub const INPUT_COUNT: usize = 3;

const MASK_KEY: u16 = 0x00FF;
const MASK_MOD: u16 = 0xFF00;
const MASK_OUTPUT: u16 = 0b11;

/// Build-time default for the counter-clockwise register
const DEFAULT_CCW: u16 = const_parse_word(env!("ROTARY_CCW_KEY"));
/// Build-time default for the clockwise register
const DEFAULT_CW: u16 = const_parse_word(env!("ROTARY_CW_KEY"));
/// Build-time default for the button register
const DEFAULT_BTN: u16 = const_parse_word(env!("ROTARY_BTN_KEY"));

/// Compiled-in defaults, used until a valid generation is recovered
pub const DEFAULT_REGISTERS: [u16; REGISTER_COUNT] =
    [MAGIC, VERSION, DEFAULT_CCW, DEFAULT_CW, DEFAULT_BTN, 0x0000];

/// Parse a `0x`-prefixed hex word at compile time
///
/// build.rs validates the value, so malformed input only reaches here if the
/// environment is bypassed; it yields 0 (no key).
const fn const_parse_word(s: &str) -> u16 {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' || (bytes[1] != b'x' && bytes[1] != b'X') {
        return 0;
    }

    let mut value: u16 = 0;
    let mut i = 2;
    while i < bytes.len() {
        let digit = match bytes[i] {
            b'0'..=b'9' => bytes[i] - b'0',
            b'a'..=b'f' => bytes[i] - b'a' + 10,
            b'A'..=b'F' => bytes[i] - b'A' + 10,
            _ => return 0,
        };
        value = (value << 4) | digit as u16;
        i += 1;
    }
    value
}

/// Logical encoder input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    /// Counter-clockwise detent
    CounterClockwise,
    /// Clockwise detent
    Clockwise,
    /// Push button
    Button,
}

impl Input {
    /// All inputs in register order
    pub const ALL: [Input; INPUT_COUNT] = [Input::CounterClockwise, Input::Clockwise, Input::Button];

    /// Register holding this input's key binding
    pub const fn register(self) -> u8 {
        match self {
            Input::CounterClockwise => REGISTER_CCW,
            Input::Clockwise => REGISTER_CW,
            Input::Button => REGISTER_BTN,
        }
    }

    /// Map a binding register back to its input
    pub const fn from_register(register: u8) -> Option<Self> {
        match register {
            REGISTER_CCW => Some(Input::CounterClockwise),
            REGISTER_CW => Some(Input::Clockwise),
            REGISTER_BTN => Some(Input::Button),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        (self.register() - REGISTER_CCW) as usize
    }
}

/// HID report an input is delivered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputType {
    /// Boot keyboard usage (key code + modifiers)
    #[default]
    Keyboard = 0,
    /// Consumer control usage (media keys)
    Consumer = 1,
    /// System control usage (sleep / power / wakeup)
    SystemControl = 2,
    /// Mouse buttons
    Mouse = 3,
}

impl OutputType {
    /// Decode a 2-bit selector; upper bits are ignored
    pub const fn from_bits(bits: u8) -> Self {
        match bits & MASK_OUTPUT as u8 {
            0 => OutputType::Keyboard,
            1 => OutputType::Consumer,
            2 => OutputType::SystemControl,
            _ => OutputType::Mouse,
        }
    }

    /// 2-bit selector value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Per-input output types, unpacked from the output register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputSelector([OutputType; INPUT_COUNT]);

impl OutputSelector {
    /// Unpack from the register word
    pub const fn unpack(word: u16) -> Self {
        let mut types = [OutputType::Keyboard; INPUT_COUNT];
        let mut i = 0;
        while i < INPUT_COUNT {
            types[i] = OutputType::from_bits((word >> (2 * i)) as u8);
            i += 1;
        }
        Self(types)
    }

    /// Pack into the register word
    pub const fn pack(&self) -> u16 {
        let mut word = 0u16;
        let mut i = 0;
        while i < INPUT_COUNT {
            word |= (self.0[i].bits() as u16) << (2 * i);
            i += 1;
        }
        word
    }

    /// Output type of one input
    pub const fn get(&self, input: Input) -> OutputType {
        self.0[input.index()]
    }

    /// Change the output type of one input
    pub fn set(&mut self, input: Input, output: OutputType) {
        self.0[input.index()] = output;
    }
}

bitflags! {
    /// HID keyboard modifier byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const LEFT_CTRL = 0x01;
        const LEFT_SHIFT = 0x02;
        const LEFT_ALT = 0x04;
        const LEFT_GUI = 0x08;
        const RIGHT_CTRL = 0x10;
        const RIGHT_SHIFT = 0x20;
        const RIGHT_ALT = 0x40;
        const RIGHT_GUI = 0x80;
    }
}

/// Which part of a binding register a field access targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// Low byte of the binding register
    KeyCode,
    /// High byte of the binding register
    Modifiers,
    /// 2-bit sub-field of the output register
    OutputType,
}

/// Complete binding of one input, as consumed by the report builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// HID usage (key code, consumer usage, system control value or button mask)
    pub key: u8,
    /// Keyboard modifiers, only meaningful for [`OutputType::Keyboard`]
    pub modifiers: Modifiers,
    /// Report the binding is delivered through
    pub output: OutputType,
}

/// Key code stored in a binding register
pub const fn key_of(word: u16) -> u8 {
    (word & MASK_KEY) as u8
}

/// Modifier mask stored in a binding register
pub const fn modifiers_of(word: u16) -> u8 {
    ((word & MASK_MOD) >> 8) as u8
}

/// Replace the key code of a binding register
pub const fn with_key(word: u16, key: u8) -> u16 {
    (word & MASK_MOD) | key as u16
}

/// Replace the modifier mask of a binding register
pub const fn with_modifiers(word: u16, modifiers: u8) -> u16 {
    (word & MASK_KEY) | ((modifiers as u16) << 8)
}
