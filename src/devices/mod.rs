//! Device drivers
//!
//! Drivers are written against the platform abstraction traits so they can be
//! exercised with the mocks on the host.
//!
//! ## Modules
//!
//! - `encoder`: Quadrature rotary encoder with push button

pub mod encoder;

pub use encoder::{Encoder, EncoderEvent, Rotation};
