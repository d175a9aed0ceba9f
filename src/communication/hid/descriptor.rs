//! HID report descriptor
//!
//! Composite descriptor with four top-level collections (mouse, keyboard,
//! consumer control, system control), each tagged with its report ID.

use super::report::ReportId;

const MOUSE: u8 = ReportId::Mouse as u8;
const KEYBOARD: u8 = ReportId::Keyboard as u8;
const CONSUMER: u8 = ReportId::Consumer as u8;
const SYSTEM_CONTROL: u8 = ReportId::SystemControl as u8;

/// Report descriptor returned for GET_DESCRIPTOR (HID report)
#[rustfmt::skip]
pub const HID_REPORT_DESCRIPTOR: &[u8] = &[
    // Mouse
    0x05, 0x01,         // USAGE_PAGE (Generic Desktop)
    0x09, 0x02,         // USAGE (Mouse)
    0xA1, 0x01,         // COLLECTION (Application)
    0x09, 0x01,         //   USAGE (Pointer)
    0xA1, 0x00,         //   COLLECTION (Physical)
    0x85, MOUSE,        //     REPORT_ID
    0x05, 0x09,         //     USAGE_PAGE (Button)
    0x19, 0x01,         //     USAGE_MINIMUM (1)
    0x29, 0x03,         //     USAGE_MAXIMUM (3)
    0x15, 0x00,         //     LOGICAL_MINIMUM (0)
    0x25, 0x01,         //     LOGICAL_MAXIMUM (1)
    0x95, 0x03,         //     REPORT_COUNT (3)
    0x75, 0x01,         //     REPORT_SIZE (1)
    0x81, 0x02,         //     INPUT (Data,Var,Abs)
    0x95, 0x01,         //     REPORT_COUNT (1)
    0x75, 0x05,         //     REPORT_SIZE (5)
    0x81, 0x03,         //     INPUT (Const,Var,Abs)
    0x05, 0x01,         //     USAGE_PAGE (Generic Desktop)
    0x09, 0x30,         //     USAGE (X)
    0x09, 0x31,         //     USAGE (Y)
    0x15, 0x81,         //     LOGICAL_MINIMUM (-127)
    0x25, 0x7F,         //     LOGICAL_MAXIMUM (127)
    0x75, 0x08,         //     REPORT_SIZE (8)
    0x95, 0x02,         //     REPORT_COUNT (2)
    0x81, 0x06,         //     INPUT (Data,Var,Rel)
    0xC0,               //   END_COLLECTION
    0xC0,               // END_COLLECTION

    // Keyboard
    0x05, 0x01,         // USAGE_PAGE (Generic Desktop)
    0x09, 0x06,         // USAGE (Keyboard)
    0xA1, 0x01,         // COLLECTION (Application)
    0x85, KEYBOARD,     //   REPORT_ID
    0x75, 0x01,         //   REPORT_SIZE (1)
    0x95, 0x08,         //   REPORT_COUNT (8)
    0x05, 0x07,         //   USAGE_PAGE (Keyboard)
    0x19, 0xE0,         //   USAGE_MINIMUM (Left Control)
    0x29, 0xE7,         //   USAGE_MAXIMUM (Right GUI)
    0x15, 0x00,         //   LOGICAL_MINIMUM (0)
    0x25, 0x01,         //   LOGICAL_MAXIMUM (1)
    0x81, 0x02,         //   INPUT (Data,Var,Abs) modifiers
    0x95, 0x01,         //   REPORT_COUNT (1)
    0x75, 0x08,         //   REPORT_SIZE (8)
    0x81, 0x03,         //   INPUT (Cnst,Var,Abs) reserved
    0x95, 0x05,         //   REPORT_COUNT (5)
    0x75, 0x01,         //   REPORT_SIZE (1)
    0x05, 0x08,         //   USAGE_PAGE (LEDs)
    0x19, 0x01,         //   USAGE_MINIMUM (Num Lock)
    0x29, 0x05,         //   USAGE_MAXIMUM (Kana)
    0x91, 0x02,         //   OUTPUT (Data,Var,Abs) LEDs
    0x95, 0x01,         //   REPORT_COUNT (1)
    0x75, 0x03,         //   REPORT_SIZE (3)
    0x91, 0x03,         //   OUTPUT (Cnst,Var,Abs) LED padding
    0x95, 0x05,         //   REPORT_COUNT (5)
    0x75, 0x08,         //   REPORT_SIZE (8)
    0x15, 0x00,         //   LOGICAL_MINIMUM (0)
    0x26, 0xA4, 0x00,   //   LOGICAL_MAXIMUM (164)
    0x05, 0x07,         //   USAGE_PAGE (Keyboard)
    0x19, 0x00,         //   USAGE_MINIMUM (0)
    0x2A, 0xA4, 0x00,   //   USAGE_MAXIMUM (164)
    0x81, 0x00,         //   INPUT (Data,Ary,Abs) key array
    0xC0,               // END_COLLECTION

    // Consumer control
    0x05, 0x0C,         // USAGE_PAGE (Consumer Devices)
    0x09, 0x01,         // USAGE (Consumer Control)
    0xA1, 0x01,         // COLLECTION (Application)
    0x85, CONSUMER,     //   REPORT_ID
    0x19, 0x00,         //   USAGE_MINIMUM (Unassigned)
    0x2A, 0x3C, 0x02,   //   USAGE_MAXIMUM (0x023C)
    0x15, 0x00,         //   LOGICAL_MINIMUM (0)
    0x26, 0x3C, 0x02,   //   LOGICAL_MAXIMUM (0x023C)
    0x95, 0x01,         //   REPORT_COUNT (1)
    0x75, 0x10,         //   REPORT_SIZE (16)
    0x81, 0x00,         //   INPUT (Data,Ary,Abs)
    0xC0,               // END_COLLECTION

    // System control
    0x05, 0x01,         // USAGE_PAGE (Generic Desktop)
    0x09, 0x80,         // USAGE (System Control)
    0xA1, 0x01,         // COLLECTION (Application)
    0x85, SYSTEM_CONTROL, //   REPORT_ID
    0x95, 0x01,         //   REPORT_COUNT (1)
    0x75, 0x02,         //   REPORT_SIZE (2)
    0x15, 0x01,         //   LOGICAL_MINIMUM (1)
    0x25, 0x03,         //   LOGICAL_MAXIMUM (3)
    0x09, 0x82,         //   USAGE (System Sleep)
    0x09, 0x81,         //   USAGE (System Power)
    0x09, 0x83,         //   USAGE (System Wakeup)
    0x81, 0x60,         //   INPUT (Data,Ary,Abs,NPrf,Null)
    0x75, 0x06,         //   REPORT_SIZE (6)
    0x81, 0x03,         //   INPUT (Cnst,Var,Abs)
    0xC0,               // END_COLLECTION
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_length() {
        assert_eq!(HID_REPORT_DESCRIPTOR.len(), 173);
    }

    #[test]
    fn test_descriptor_report_ids() {
        let ids: std::vec::Vec<u8> = HID_REPORT_DESCRIPTOR
            .windows(2)
            .filter(|w| w[0] == 0x85)
            .map(|w| w[1])
            .collect();

        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[test]
    fn test_collections_balanced() {
        let opened = HID_REPORT_DESCRIPTOR
            .windows(2)
            .filter(|w| w[0] == 0xA1 && w[1] <= 0x01)
            .count();
        let closed = HID_REPORT_DESCRIPTOR.iter().filter(|&&b| b == 0xC0).count();

        assert_eq!(opened, 5);
        assert_eq!(closed, 5);
    }
}
