#![cfg_attr(not(test), no_std)]

//! rotary_hid - Rotary encoder USB HID keypad
//!
//! This library provides the platform abstraction, the encoder driver, the HID
//! report layer and a wear-leveled EEPROM settings store for a single-knob
//! keypad whose three inputs (counter-clockwise, clockwise, button) are each
//! bound to a configurable key.

// Platform abstraction layer (EEPROM, GPIO, errors, mocks)
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Logging and persistent settings
pub mod core;

// USB HID reports and class requests
pub mod communication;
