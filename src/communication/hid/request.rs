//! HID class request handling
//!
//! Answers the class-specific control requests a host issues on endpoint 0:
//!
//! - **GET_REPORT**: all-zero report of the requested ID
//! - **GET_IDLE / SET_IDLE**: idle rate in 4 ms units
//! - **GET_PROTOCOL / SET_PROTOCOL**: boot (0) or report (1) protocol
//! - **SET_REPORT**: accepted and discarded (keyboard LEDs)
//!
//! Standard and vendor requests are left to the USB stack.

use super::report::Report;
use heapless::Vec;

/// bmRequestType type bits
const REQUEST_TYPE_MASK: u8 = 0x60;
const REQUEST_TYPE_CLASS: u8 = 0x20;

/// HID class request codes
pub const HID_GET_REPORT: u8 = 0x01;
pub const HID_GET_IDLE: u8 = 0x02;
pub const HID_GET_PROTOCOL: u8 = 0x03;
pub const HID_SET_REPORT: u8 = 0x09;
pub const HID_SET_IDLE: u8 = 0x0A;
pub const HID_SET_PROTOCOL: u8 = 0x0B;

/// Default idle rate (500 ms in 4 ms units)
pub const DEFAULT_IDLE_RATE: u8 = (500 / 4) as u8;

/// Largest data stage this handler produces
pub const MAX_RESPONSE_SIZE: usize = 8;

/// 8-byte SETUP packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupRequest {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupRequest {
    /// Decode a raw SETUP packet (fields little endian)
    pub fn parse(data: &[u8; 8]) -> Self {
        Self {
            request_type: data[0],
            request: data[1],
            value: u16::from_le_bytes([data[2], data[3]]),
            index: u16::from_le_bytes([data[4], data[5]]),
            length: u16::from_le_bytes([data[6], data[7]]),
        }
    }

    /// Whether this is a class-specific request
    pub fn is_class(&self) -> bool {
        self.request_type & REQUEST_TYPE_MASK == REQUEST_TYPE_CLASS
    }

    fn value_low(&self) -> u8 {
        self.value.to_le_bytes()[0]
    }

    fn value_high(&self) -> u8 {
        self.value.to_le_bytes()[1]
    }
}

/// Outcome of a control request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlResponse {
    /// Data stage to send to the host
    Data(Vec<u8, MAX_RESPONSE_SIZE>),
    /// Request handled, no data stage
    Accepted,
    /// Not a request this handler answers
    Ignored,
}

/// Host-visible HID interface state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidRequestState {
    idle_rate: u8,
    protocol: u8,
    connected: bool,
}

impl Default for HidRequestState {
    fn default() -> Self {
        Self {
            idle_rate: DEFAULT_IDLE_RATE,
            protocol: 0,
            connected: false,
        }
    }
}

impl HidRequestState {
    /// Create state with the default idle rate and boot protocol
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle rate in 4 ms units (0 = report only on change)
    pub fn idle_rate(&self) -> u8 {
        self.idle_rate
    }

    /// Active protocol (0 = boot, 1 = report)
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Whether the host has issued any control request
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Handle one SETUP request
    pub fn handle(&mut self, request: &SetupRequest) -> ControlResponse {
        self.connected = true;

        if !request.is_class() {
            return ControlResponse::Ignored;
        }

        match request.request {
            HID_GET_IDLE => single_byte(self.idle_rate),
            HID_SET_IDLE => {
                self.idle_rate = request.value_high();
                crate::log_debug!("HID idle rate set to {}", self.idle_rate);
                ControlResponse::Accepted
            }
            HID_GET_PROTOCOL => single_byte(self.protocol),
            HID_SET_PROTOCOL => {
                self.protocol = request.value_high();
                ControlResponse::Accepted
            }
            HID_GET_REPORT => {
                let report = Report::zeroed(request.value_low());
                ControlResponse::Data(Vec::from_slice(report.as_bytes()).unwrap_or_default())
            }
            HID_SET_REPORT => ControlResponse::Accepted,
            other => {
                crate::log_debug!("Unsupported HID request {}", other);
                ControlResponse::Ignored
            }
        }
    }
}

fn single_byte(value: u8) -> ControlResponse {
    let mut data = Vec::new();
    // Capacity is MAX_RESPONSE_SIZE
    let _ = data.push(value);
    ControlResponse::Data(data)
}

#[cfg(feature = "embassy")]
mod embassy {
    use super::*;
    use embassy_usb::class::hid::{ReportId, RequestHandler};
    use embassy_usb::control::OutResponse;

    /// Idle rate unit in milliseconds
    const IDLE_UNIT_MS: u32 = 4;

    impl RequestHandler for HidRequestState {
        fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
            self.connected = true;
            let raw = match id {
                ReportId::In(raw) | ReportId::Out(raw) | ReportId::Feature(raw) => raw,
            };

            let report = Report::zeroed(raw);
            let len = report.len().min(buf.len());
            buf[..len].copy_from_slice(&report.as_bytes()[..len]);
            Some(len)
        }

        fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
            self.connected = true;
            OutResponse::Accepted
        }

        fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
            Some(self.idle_rate as u32 * IDLE_UNIT_MS)
        }

        fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
            self.connected = true;
            self.idle_rate = (duration_ms / IDLE_UNIT_MS).min(u8::MAX as u32) as u8;
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_get_report_fills_buffer() {
            let mut state = HidRequestState::new();
            let mut buf = [0xAAu8; 8];

            assert_eq!(state.get_report(ReportId::In(3), &mut buf), Some(3));
            assert_eq!(&buf[..3], &[3, 0, 0]);
            assert!(state.is_connected());

            assert_eq!(state.get_report(ReportId::In(2), &mut buf[..4]), Some(4));
            assert_eq!(&buf[..4], &[2, 0, 0, 0]);
        }

        #[test]
        fn test_idle_in_milliseconds() {
            let mut state = HidRequestState::new();
            assert_eq!(state.get_idle_ms(None), Some(500));

            state.set_idle_ms(None, 40);
            assert_eq!(state.idle_rate(), 10);
            assert_eq!(state.get_idle_ms(None), Some(40));

            state.set_idle_ms(None, 10_000);
            assert_eq!(state.idle_rate(), u8::MAX);
        }

        #[test]
        fn test_set_report_accepted() {
            let mut state = HidRequestState::new();
            let response = state.set_report(ReportId::Out(2), &[2, 0x01]);
            assert!(matches!(response, OutResponse::Accepted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_request(request: u8, value: u16) -> SetupRequest {
        SetupRequest {
            request_type: 0xA1,
            request,
            value,
            index: 0,
            length: 8,
        }
    }

    fn data(response: ControlResponse) -> std::vec::Vec<u8> {
        match response {
            ControlResponse::Data(bytes) => bytes.to_vec(),
            other => panic!("expected data stage, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_setup_packet() {
        let request = SetupRequest::parse(&[0x21, 0x0A, 0x00, 0x7D, 0x00, 0x00, 0x00, 0x00]);

        assert!(request.is_class());
        assert_eq!(request.request, HID_SET_IDLE);
        assert_eq!(request.value, 0x7D00);
    }

    #[test]
    fn test_defaults() {
        let state = HidRequestState::new();
        assert_eq!(state.idle_rate(), 125);
        assert_eq!(state.protocol(), 0);
        assert!(!state.is_connected());
    }

    #[test]
    fn test_idle_rate() {
        let mut state = HidRequestState::new();
        assert_eq!(data(state.handle(&class_request(HID_GET_IDLE, 0))), [125]);

        let response = state.handle(&class_request(HID_SET_IDLE, 0x0000));
        assert_eq!(response, ControlResponse::Accepted);
        assert_eq!(data(state.handle(&class_request(HID_GET_IDLE, 0))), [0]);

        state.handle(&class_request(HID_SET_IDLE, 0x2A00));
        assert_eq!(state.idle_rate(), 0x2A);
    }

    #[test]
    fn test_protocol() {
        let mut state = HidRequestState::new();
        state.handle(&class_request(HID_SET_PROTOCOL, 0x0100));

        assert_eq!(state.protocol(), 1);
        assert_eq!(data(state.handle(&class_request(HID_GET_PROTOCOL, 0))), [1]);
    }

    #[test]
    fn test_get_report_sizes() {
        let mut state = HidRequestState::new();

        assert_eq!(data(state.handle(&class_request(HID_GET_REPORT, 0x0101))), [1, 0, 0, 0]);
        assert_eq!(
            data(state.handle(&class_request(HID_GET_REPORT, 0x0102))),
            [2, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(data(state.handle(&class_request(HID_GET_REPORT, 0x0103))), [3, 0, 0]);
        assert_eq!(data(state.handle(&class_request(HID_GET_REPORT, 0x0104))), [4, 0]);
        assert_eq!(data(state.handle(&class_request(HID_GET_REPORT, 0x0107))).len(), 8);
    }

    #[test]
    fn test_set_report_accepted() {
        let mut state = HidRequestState::new();
        let response = state.handle(&class_request(HID_SET_REPORT, 0x0202));
        assert_eq!(response, ControlResponse::Accepted);
    }

    #[test]
    fn test_non_class_request_ignored() {
        let mut state = HidRequestState::new();
        let mut request = class_request(HID_SET_IDLE, 0x1000);
        // Standard GET_DESCRIPTOR direction/type bits
        request.request_type = 0x81;

        assert_eq!(state.handle(&request), ControlResponse::Ignored);
        assert_eq!(state.idle_rate(), DEFAULT_IDLE_RATE);
        // Any request marks the host as present
        assert!(state.is_connected());
    }

    #[test]
    fn test_unknown_class_request_ignored() {
        let mut state = HidRequestState::new();
        assert_eq!(state.handle(&class_request(0x05, 0)), ControlResponse::Ignored);
    }
}
