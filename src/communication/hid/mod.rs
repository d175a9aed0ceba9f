//! USB HID interface
//!
//! - `report`: input report IDs, sizes and encoding per output type
//! - `descriptor`: composite report descriptor
//! - `request`: class request state (idle rate, protocol, GET_REPORT)
//! - `keypad`: encoder events to report sequences

pub mod descriptor;
pub mod keypad;
pub mod report;
pub mod request;

pub use descriptor::HID_REPORT_DESCRIPTOR;
pub use keypad::KeypadController;
pub use report::{Report, ReportId};
pub use request::{ControlResponse, HidRequestState, SetupRequest};
