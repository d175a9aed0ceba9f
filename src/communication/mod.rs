//! Communication Protocols
//!
//! # Protocols
//!
//! - **USB HID**: composite keyboard / consumer / system control / mouse
//!   interface driven by the encoder
//!
//! # Transport
//!
//! The USB device stack itself is supplied by the firmware binary; with the
//! `embassy` feature [`hid::HidRequestState`] plugs into `embassy-usb`.

pub mod hid;
