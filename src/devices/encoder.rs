//! Rotary encoder driver (quadrature phases plus push button)
//!
//! Phases A and B are sampled into a 2-bit state (`B << 1 | A`). Every state
//! change is shifted into an 8-bit history; a full detent produces one of two
//! characteristic histories:
//!
//! ```text
//! clockwise          11 -> 01 -> 00 -> 10   history 0xD2
//! counter-clockwise  11 -> 10 -> 00 -> 01   history 0xE1
//! ```
//!
//! Bounces between adjacent states never complete either pattern, so no
//! separate debouncing is needed. The button is active low.
//!
//! # Example
//!
//! ```ignore
//! use rotary_hid::devices::encoder::{Encoder, EncoderEvent};
//! use rotary_hid::platform::mock::MockGpio;
//!
//! let mut encoder = Encoder::new(
//!     MockGpio::new_pull_up(),
//!     MockGpio::new_pull_up(),
//!     MockGpio::new_pull_up(),
//! )?;
//!
//! loop {
//!     if let Some(event) = encoder.poll_event() {
//!         // Send reports
//!     }
//! }
//! ```

use crate::core::settings::Input;
use crate::platform::{GpioInterface, GpioMode, Result};

const HISTORY_CLOCKWISE: u8 = 0xD2;
const HISTORY_COUNTER_CLOCKWISE: u8 = 0xE1;
const STATE_MASK: u8 = 0b11;

/// Direction of one detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Clockwise detent
    Clockwise,
    /// Counter-clockwise detent
    CounterClockwise,
}

impl Rotation {
    /// Settings input bound to this direction
    pub fn input(self) -> Input {
        match self {
            Rotation::Clockwise => Input::Clockwise,
            Rotation::CounterClockwise => Input::CounterClockwise,
        }
    }
}

/// Input event produced by [`Encoder::poll_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    /// One detent was completed
    Rotated(Rotation),
    /// Button went down
    ButtonPressed,
    /// Button went up
    ButtonReleased,
}

/// Quadrature decoder over three input pins
pub struct Encoder<A: GpioInterface, B: GpioInterface, BTN: GpioInterface> {
    phase_a: A,
    phase_b: B,
    button: BTN,
    /// Last four distinct phase states, newest in the low bits
    history: u8,
    /// Detent waiting for [`take_rotation`](Self::take_rotation)
    pending: Option<Rotation>,
    /// Button state reported by the last event
    button_down: bool,
}

impl<A: GpioInterface, B: GpioInterface, BTN: GpioInterface> Encoder<A, B, BTN> {
    /// Configure the pins as pulled-up inputs and create the decoder
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if a pin cannot be switched to pull-up mode.
    pub fn new(mut phase_a: A, mut phase_b: B, mut button: BTN) -> Result<Self> {
        phase_a.set_mode(GpioMode::InputPullUp)?;
        phase_b.set_mode(GpioMode::InputPullUp)?;
        button.set_mode(GpioMode::InputPullUp)?;

        Ok(Self {
            phase_a,
            phase_b,
            button,
            history: 0,
            pending: None,
            button_down: false,
        })
    }

    fn phase_state(&self) -> u8 {
        (self.phase_a.read() as u8) | ((self.phase_b.read() as u8) << 1)
    }

    /// Sample the phases and latch a completed detent
    ///
    /// Call at a rate well above the fastest expected rotation. A new detent
    /// replaces one that has not been taken yet.
    pub fn poll(&mut self) {
        let state = self.phase_state();
        if state == self.history & STATE_MASK {
            return;
        }

        self.history = (self.history << 2) | state;
        match self.history {
            HISTORY_CLOCKWISE => self.pending = Some(Rotation::Clockwise),
            HISTORY_COUNTER_CLOCKWISE => self.pending = Some(Rotation::CounterClockwise),
            _ => {}
        }
    }

    /// Return and clear the latched detent
    pub fn take_rotation(&mut self) -> Option<Rotation> {
        self.pending.take()
    }

    /// Whether the button is currently held (pin low)
    pub fn button_pressed(&self) -> bool {
        !self.button.read()
    }

    /// Poll once and report at most one event
    ///
    /// Button edges take precedence; a detent latched in the same poll is
    /// reported by the next call.
    pub fn poll_event(&mut self) -> Option<EncoderEvent> {
        self.poll();

        let pressed = self.button_pressed();
        if pressed != self.button_down {
            self.button_down = pressed;
            return Some(if pressed {
                EncoderEvent::ButtonPressed
            } else {
                EncoderEvent::ButtonReleased
            });
        }

        self.take_rotation().map(EncoderEvent::Rotated)
    }

    /// Borrow the pins (for testing)
    pub fn pins_mut(&mut self) -> (&mut A, &mut B, &mut BTN) {
        (&mut self.phase_a, &mut self.phase_b, &mut self.button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;

    type TestEncoder = Encoder<MockGpio, MockGpio, MockGpio>;

    fn encoder() -> TestEncoder {
        Encoder::new(
            MockGpio::new_input(),
            MockGpio::new_input(),
            MockGpio::new_input(),
        )
        .unwrap()
    }

    /// Drive the phases through `states` (`B << 1 | A`), polling after each
    fn drive(encoder: &mut TestEncoder, states: &[u8]) {
        for &state in states {
            let (a, b, _) = encoder.pins_mut();
            a.set_input_state(state & 0b01 != 0);
            b.set_input_state(state & 0b10 != 0);
            encoder.poll();
        }
    }

    fn set_button(encoder: &mut TestEncoder, down: bool) {
        let (_, _, button) = encoder.pins_mut();
        button.set_input_state(!down);
    }

    #[test]
    fn test_new_enables_pull_ups() {
        let mut encoder = encoder();
        let (a, b, button) = encoder.pins_mut();

        assert_eq!(a.mode(), GpioMode::InputPullUp);
        assert_eq!(b.mode(), GpioMode::InputPullUp);
        assert_eq!(button.mode(), GpioMode::InputPullUp);
    }

    #[test]
    fn test_clockwise_detent() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11, 0b01, 0b00, 0b10]);

        assert_eq!(encoder.take_rotation(), Some(Rotation::Clockwise));
        assert_eq!(encoder.take_rotation(), None);
    }

    #[test]
    fn test_counter_clockwise_detent() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11, 0b10, 0b00, 0b01]);

        assert_eq!(encoder.take_rotation(), Some(Rotation::CounterClockwise));
    }

    #[test]
    fn test_consecutive_detents() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11, 0b01, 0b00, 0b10, 0b11]);
        assert_eq!(encoder.take_rotation(), Some(Rotation::Clockwise));

        drive(&mut encoder, &[0b01, 0b00, 0b10]);
        assert_eq!(encoder.take_rotation(), Some(Rotation::Clockwise));

        drive(&mut encoder, &[0b11, 0b10, 0b00, 0b01]);
        assert_eq!(encoder.take_rotation(), Some(Rotation::CounterClockwise));
    }

    #[test]
    fn test_repeated_samples_ignored() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11, 0b11, 0b01, 0b01, 0b00, 0b00, 0b00, 0b10]);

        assert_eq!(encoder.take_rotation(), Some(Rotation::Clockwise));
    }

    #[test]
    fn test_contact_bounce_does_not_latch() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11, 0b01, 0b11, 0b01, 0b11]);

        assert_eq!(encoder.take_rotation(), None);
    }

    #[test]
    fn test_button_active_low() {
        let mut encoder = encoder();
        set_button(&mut encoder, false);
        assert!(!encoder.button_pressed());

        set_button(&mut encoder, true);
        assert!(encoder.button_pressed());
    }

    #[test]
    fn test_poll_event_button_edges() {
        let mut encoder = encoder();
        drive(&mut encoder, &[0b11]);
        set_button(&mut encoder, false);
        assert_eq!(encoder.poll_event(), None);

        set_button(&mut encoder, true);
        assert_eq!(encoder.poll_event(), Some(EncoderEvent::ButtonPressed));
        assert_eq!(encoder.poll_event(), None);

        set_button(&mut encoder, false);
        assert_eq!(encoder.poll_event(), Some(EncoderEvent::ButtonReleased));
        assert_eq!(encoder.poll_event(), None);
    }

    #[test]
    fn test_poll_event_rotation() {
        let mut encoder = encoder();
        set_button(&mut encoder, false);
        drive(&mut encoder, &[0b11, 0b10, 0b00]);
        assert_eq!(encoder.poll_event(), None);

        let (a, b, _) = encoder.pins_mut();
        a.set_input_state(true);
        b.set_input_state(false);
        assert_eq!(
            encoder.poll_event(),
            Some(EncoderEvent::Rotated(Rotation::CounterClockwise))
        );
    }

    #[test]
    fn test_button_edge_before_rotation() {
        let mut encoder = encoder();
        set_button(&mut encoder, false);
        drive(&mut encoder, &[0b11, 0b01, 0b00]);

        let (a, b, _) = encoder.pins_mut();
        a.set_input_state(false);
        b.set_input_state(true);
        set_button(&mut encoder, true);

        assert_eq!(encoder.poll_event(), Some(EncoderEvent::ButtonPressed));
        assert_eq!(
            encoder.poll_event(),
            Some(EncoderEvent::Rotated(Rotation::Clockwise))
        );
    }

    #[test]
    fn test_rotation_input() {
        assert_eq!(Rotation::Clockwise.input(), Input::Clockwise);
        assert_eq!(Rotation::CounterClockwise.input(), Input::CounterClockwise);
    }
}
