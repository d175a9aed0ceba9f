//! Core functionality
//!
//! Logging macros and the persistent settings store.

pub mod logging;
pub mod settings;
