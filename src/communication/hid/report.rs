//! HID input reports
//!
//! The device exposes one composite HID interface with four report IDs. Every
//! report starts with its ID byte.
//!
//! | ID | Report         | Size | Layout                                  |
//! |----|----------------|------|-----------------------------------------|
//! | 1  | Mouse          | 4    | `id, buttons, x, y`                     |
//! | 2  | Keyboard       | 8    | `id, modifiers, reserved, key, 0, 0, 0, 0` |
//! | 3  | Consumer       | 3    | `id, usage_lo, usage_hi`                |
//! | 4  | System control | 2    | `id, usage`                             |

use crate::core::settings::{KeyBinding, OutputType};
use heapless::Vec;

/// Largest report in bytes, including the ID
pub const MAX_REPORT_SIZE: usize = 8;

const MOUSE_BUTTON_MASK: u8 = 0x07;
const SYSTEM_CONTROL_MASK: u8 = 0x03;

/// Report ID of the composite HID interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportId {
    /// Mouse buttons and relative movement
    Mouse = 1,
    /// Boot-style keyboard
    Keyboard = 2,
    /// Consumer control (media keys)
    Consumer = 3,
    /// System control (power, sleep, wakeup)
    SystemControl = 4,
}

impl ReportId {
    /// Decode a report ID byte
    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            1 => Some(ReportId::Mouse),
            2 => Some(ReportId::Keyboard),
            3 => Some(ReportId::Consumer),
            4 => Some(ReportId::SystemControl),
            _ => None,
        }
    }

    /// Report size in bytes, including the ID
    pub fn size(self) -> usize {
        match self {
            ReportId::Mouse => 4,
            ReportId::Keyboard => 8,
            ReportId::Consumer => 3,
            ReportId::SystemControl => 2,
        }
    }

    /// Report carrying bindings of the given output type
    pub fn for_output(output: OutputType) -> Self {
        match output {
            OutputType::Keyboard => ReportId::Keyboard,
            OutputType::Consumer => ReportId::Consumer,
            OutputType::SystemControl => ReportId::SystemControl,
            OutputType::Mouse => ReportId::Mouse,
        }
    }
}

/// One input report ready to be sent on the interrupt endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    bytes: Vec<u8, MAX_REPORT_SIZE>,
}

impl Report {
    /// All-zero report for a raw ID byte, as answered to GET_REPORT
    ///
    /// Unknown IDs get a full-size buffer carrying the requested ID.
    pub fn zeroed(id: u8) -> Self {
        let size = ReportId::from_u8(id).map_or(MAX_REPORT_SIZE, ReportId::size);
        let mut buf = [0u8; MAX_REPORT_SIZE];
        buf[0] = id;
        Self::from_buf(&buf[..size])
    }

    /// Report signalling the press of `binding`
    pub fn press(binding: &KeyBinding) -> Self {
        let id = ReportId::for_output(binding.output);
        let mut buf = [0u8; MAX_REPORT_SIZE];
        buf[0] = id as u8;

        match id {
            ReportId::Keyboard => {
                buf[1] = binding.modifiers.bits();
                buf[3] = binding.key;
            }
            ReportId::Consumer => {
                let usage = binding.key as u16;
                buf[1..3].copy_from_slice(&usage.to_le_bytes());
            }
            ReportId::SystemControl => buf[1] = binding.key & SYSTEM_CONTROL_MASK,
            ReportId::Mouse => buf[1] = binding.key & MOUSE_BUTTON_MASK,
        }

        Self::from_buf(&buf[..id.size()])
    }

    /// Report releasing everything on the report used by `output`
    pub fn release(output: OutputType) -> Self {
        Self::zeroed(ReportId::for_output(output) as u8)
    }

    fn from_buf(buf: &[u8]) -> Self {
        // buf never exceeds MAX_REPORT_SIZE
        Self {
            bytes: Vec::from_slice(buf).unwrap_or_default(),
        }
    }

    /// Report ID byte
    pub fn id(&self) -> u8 {
        self.bytes.first().copied().unwrap_or(0)
    }

    /// Wire bytes, including the ID
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the report is empty (never the case for built reports)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::Modifiers;

    fn binding(key: u8, modifiers: Modifiers, output: OutputType) -> KeyBinding {
        KeyBinding {
            key,
            modifiers,
            output,
        }
    }

    #[test]
    fn test_keyboard_press() {
        let report = Report::press(&binding(0x56, Modifiers::LEFT_SHIFT, OutputType::Keyboard));
        assert_eq!(report.as_bytes(), &[2, 0x02, 0, 0x56, 0, 0, 0, 0]);
        assert_eq!(report.id(), ReportId::Keyboard as u8);
    }

    #[test]
    fn test_consumer_press() {
        // Volume up
        let report = Report::press(&binding(0xE9, Modifiers::empty(), OutputType::Consumer));
        assert_eq!(report.as_bytes(), &[3, 0xE9, 0x00]);
    }

    #[test]
    fn test_consumer_ignores_modifiers() {
        let report = Report::press(&binding(0xEA, Modifiers::all(), OutputType::Consumer));
        assert_eq!(report.as_bytes(), &[3, 0xEA, 0x00]);
    }

    #[test]
    fn test_system_control_press() {
        let report = Report::press(&binding(0xFE, Modifiers::empty(), OutputType::SystemControl));
        assert_eq!(report.as_bytes(), &[4, 0x02]);
    }

    #[test]
    fn test_mouse_press() {
        let report = Report::press(&binding(0xFC, Modifiers::empty(), OutputType::Mouse));
        assert_eq!(report.as_bytes(), &[1, 0x04, 0, 0]);
    }

    #[test]
    fn test_release() {
        assert_eq!(Report::release(OutputType::Keyboard).as_bytes(), &[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(Report::release(OutputType::Consumer).as_bytes(), &[3, 0, 0]);
        assert_eq!(Report::release(OutputType::SystemControl).as_bytes(), &[4, 0]);
        assert_eq!(Report::release(OutputType::Mouse).as_bytes(), &[1, 0, 0, 0]);
    }

    #[test]
    fn test_zeroed_unknown_id() {
        let report = Report::zeroed(9);
        assert_eq!(report.len(), MAX_REPORT_SIZE);
        assert_eq!(report.as_bytes(), &[9, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_report_sizes() {
        for id in 1..=4 {
            let report_id = ReportId::from_u8(id).unwrap();
            assert_eq!(Report::zeroed(id).len(), report_id.size());
        }
        assert_eq!(ReportId::from_u8(0), None);
    }
}
