//! Encoder events to HID reports
//!
//! A detent is a momentary key stroke: press immediately followed by release.
//! The button follows the physical switch, so a held button is a held key.

use super::report::Report;
use crate::core::settings::{Input, OutputType, SettingsStore};
use crate::devices::encoder::EncoderEvent;
use crate::platform::EepromInterface;
use heapless::Vec;

/// Reports produced for a single event
pub type Reports = Vec<Report, 2>;

/// Translates encoder events into reports using the stored bindings
#[derive(Debug, Default)]
pub struct KeypadController {
    /// Report the held button was pressed on, so its release goes to the same
    /// report even if the binding changes meanwhile
    held_button: Option<OutputType>,
}

impl KeypadController {
    /// Create a controller with the button released
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports to send for `event`, in order
    pub fn reports_for<E: EepromInterface>(
        &mut self,
        event: EncoderEvent,
        store: &SettingsStore<E>,
    ) -> Reports {
        let mut reports = Reports::new();

        match event {
            EncoderEvent::Rotated(rotation) => {
                let binding = store.binding(rotation.input());
                let _ = reports.push(Report::press(&binding));
                let _ = reports.push(Report::release(binding.output));
            }
            EncoderEvent::ButtonPressed => {
                let binding = store.binding(Input::Button);
                self.held_button = Some(binding.output);
                let _ = reports.push(Report::press(&binding));
            }
            EncoderEvent::ButtonReleased => {
                let output = self
                    .held_button
                    .take()
                    .unwrap_or_else(|| store.binding(Input::Button).output);
                let _ = reports.push(Report::release(output));
            }
        }

        reports
    }

    /// Whether the button press has been reported without its release
    pub fn button_held(&self) -> bool {
        self.held_button.is_some()
    }
}
