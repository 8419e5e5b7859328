//! Bounded signed speed state with directional reset and clamping.
//!
//! [`SpeedModel`] converts accepted input events (button edges or decoded
//! console keys) into a clamped signed value in [−255, 255]. It is a pure
//! state machine: deterministic, no I/O, no locks, no notion of time beyond
//! what the debounce sampler already filtered.
//!
//! ## Transition rules, in precedence order
//!
//! 1. Both directions simultaneously active forces the value to `0`,
//!    regardless of prior sign (the [`Stop`](InputEvent::Stop) event).
//! 2. An increment with a negative value first resets to `0`, then adds the
//!    step, then clamps — a direction change never flips the opposite
//!    sign's magnitude instantaneously.
//! 3. A decrement is symmetric against the lower bound.
//!
//! The module also decodes the single-character command symbols the console
//! collaborator delivers for the serial-driven variants.

use crate::consts::{SPEED_MAX, SPEED_MIN, SPEED_STEP};
use thiserror::Error;

/// An unrecognized console command symbol.
///
/// The caller ignores the key, prints its hint, and performs no state
/// change and no transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[error("unrecognized command key {0:#04x}")]
pub struct InvalidKey(
    /// The offending byte as read from the console.
    pub u8,
);

/// Abstract input event applied to the speed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum InputEvent {
    /// Accepted forward press or forward key.
    Increment,
    /// Accepted backward press or backward key.
    Decrement,
    /// Stop request: both lines active, or the stop key.
    Stop,
}

impl InputEvent {
    /// Decodes a console command symbol for the speed-driven variant.
    ///
    /// `f`/`u` increment, `b`/`d` decrement, `s` stops; case insensitive.
    pub fn from_key(key: u8) -> Result<Self, InvalidKey> {
        match key {
            b'f' | b'F' | b'u' | b'U' => Ok(Self::Increment),
            b'b' | b'B' | b'd' | b'D' => Ok(Self::Decrement),
            b's' | b'S' => Ok(Self::Stop),
            other => Err(InvalidKey(other)),
        }
    }
}

/// Decodes a console command symbol for the LED variant.
///
/// `u` turns the output on, `d` turns it off; case insensitive.
pub fn led_key(key: u8) -> Result<bool, InvalidKey> {
    match key {
        b'u' | b'U' => Ok(true),
        b'd' | b'D' => Ok(false),
        other => Err(InvalidKey(other)),
    }
}

/// The transmitter's signed speed state.
///
/// Created at startup at `0` and owned by the main loop for the process
/// lifetime. The value always satisfies `SPEED_MIN <= value <= SPEED_MAX`.
#[derive(Debug, Clone, Copy)]
pub struct SpeedModel {
    value: i16,
    step: i16,
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedModel {
    /// Creates the model at `0` with the default step.
    pub fn new() -> Self {
        Self::with_step(SPEED_STEP)
    }

    /// Creates the model at `0` with a custom step per event.
    pub fn with_step(step: i16) -> Self {
        Self { value: 0, step }
    }

    /// The current clamped value.
    pub fn value(&self) -> i16 {
        self.value
    }

    /// Applies one event, returning the new value and whether it differs
    /// from the previous one.
    pub fn apply(&mut self, event: InputEvent) -> (i16, bool) {
        let previous = self.value;
        self.value = match event {
            InputEvent::Stop => 0,
            InputEvent::Increment => {
                // Direction change clears the opposite sign before
                // accumulating in the new direction.
                let base = self.value.max(0);
                base.saturating_add(self.step).min(SPEED_MAX)
            }
            InputEvent::Decrement => {
                let base = self.value.min(0);
                base.saturating_sub(self.step).max(SPEED_MIN)
            }
        };
        (self.value, self.value != previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_increments_ramp_and_clamp() {
        let mut model = SpeedModel::new();
        assert_eq!(model.apply(InputEvent::Increment), (100, true));
        assert_eq!(model.apply(InputEvent::Increment), (200, true));
        assert_eq!(model.apply(InputEvent::Increment), (255, true));
        // Held at the bound: no further change.
        assert_eq!(model.apply(InputEvent::Increment), (255, false));
    }

    #[test]
    fn direction_change_resets_before_accumulating() {
        let mut model = SpeedModel::new();
        let _ = model.apply(InputEvent::Increment);
        let _ = model.apply(InputEvent::Increment);
        assert_eq!(model.value(), 200);
        // 200 -> reset to 0 -> subtract 100, never 200 - 100.
        assert_eq!(model.apply(InputEvent::Decrement), (-100, true));
    }

    #[test]
    fn stop_forces_zero_from_either_sign() {
        let mut model = SpeedModel::new();
        let _ = model.apply(InputEvent::Decrement);
        assert_eq!(model.value(), -100);
        assert_eq!(model.apply(InputEvent::Stop), (0, true));
        let _ = model.apply(InputEvent::Increment);
        assert_eq!(model.apply(InputEvent::Stop), (0, true));
        // Already stopped: value unchanged.
        assert_eq!(model.apply(InputEvent::Stop), (0, false));
    }

    #[test]
    fn value_stays_clamped_under_arbitrary_sequences() {
        let mut model = SpeedModel::with_step(90);
        let events = [
            InputEvent::Increment,
            InputEvent::Increment,
            InputEvent::Increment,
            InputEvent::Increment,
            InputEvent::Decrement,
            InputEvent::Decrement,
            InputEvent::Stop,
            InputEvent::Decrement,
            InputEvent::Decrement,
            InputEvent::Decrement,
            InputEvent::Decrement,
            InputEvent::Increment,
        ];
        for event in events {
            let (value, _) = model.apply(event);
            assert!((SPEED_MIN..=SPEED_MAX).contains(&value));
        }
    }

    #[test]
    fn large_step_clamps_immediately() {
        let mut model = SpeedModel::with_step(i16::MAX);
        assert_eq!(model.apply(InputEvent::Increment), (255, true));
        assert_eq!(model.apply(InputEvent::Decrement), (-255, true));
    }

    #[test]
    fn speed_keys_decode() {
        assert_eq!(InputEvent::from_key(b'f'), Ok(InputEvent::Increment));
        assert_eq!(InputEvent::from_key(b'U'), Ok(InputEvent::Increment));
        assert_eq!(InputEvent::from_key(b'b'), Ok(InputEvent::Decrement));
        assert_eq!(InputEvent::from_key(b's'), Ok(InputEvent::Stop));
        assert_eq!(InputEvent::from_key(b'x'), Err(InvalidKey(b'x')));
    }

    #[test]
    fn led_keys_decode() {
        assert_eq!(led_key(b'u'), Ok(true));
        assert_eq!(led_key(b'D'), Ok(false));
        assert_eq!(led_key(b'?'), Err(InvalidKey(b'?')));
    }
}
