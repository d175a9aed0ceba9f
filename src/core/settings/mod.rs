//! Persistent key-binding settings
//!
//! - [`record`]: register map, defaults and field packing
//! - [`layout`]: slot and status-ring geometry on the EEPROM
//! - [`store`]: wear-leveled commit and crash-safe recovery

pub mod layout;
pub mod record;
pub mod store;

pub use layout::RingLayout;
pub use record::{FieldKind, Input, KeyBinding, Modifiers, OutputSelector, OutputType};
pub use store::{SettingsStore, StoreStats};
