//! Inbound frame dispatch and actuation on the receiver node.
//!
//! [`Dispatcher`] decodes each received frame for the statically-configured
//! command variant and invokes exactly one actuation effect per message.
//! It runs on whatever execution context the radio stack delivers frames on
//! — possibly shared with the stack's own processing — so it completes
//! quickly, performs no blocking I/O, and never panics: a frame whose
//! length does not match the configured layout is counted and dropped.
//!
//! The actuation itself sits behind the [`Actuator`] trait so one
//! dispatcher covers every deployed pair: a binary output for the LED
//! variant, a drive level for the motor variant, retained values for the
//! text and counter variants.

use crate::link::PeerAddress;
use crate::message::{DualCounter, LedCommand, SpeedCommand, TextCommand, Wire};
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

/// Maps one decoded command onto its output effect.
///
/// Exactly one actuation is invoked per well-formed frame; implementations
/// must not block.
pub trait Actuator {
    /// The command variant this actuator is deployed against.
    type Command: Wire;

    /// Applies one decoded command to the output.
    fn actuate(&mut self, command: &Self::Command);
}

/// Decodes inbound frames and drives a single [`Actuator`].
#[derive(Debug)]
pub struct Dispatcher<A: Actuator> {
    actuator: A,
    last_sender: Option<PeerAddress>,

    /// Frames decoded and actuated.
    pub rx_good: u16,
    /// Frames dropped for a length mismatch.
    pub rx_bad: u16,
}

impl<A: Actuator> Dispatcher<A> {
    /// Creates a dispatcher around the given actuator.
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            last_sender: None,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// Handles one inbound frame from the radio stack's receive callback.
    ///
    /// A malformed frame (wrong length for the configured variant) bumps
    /// [`rx_bad`](Dispatcher::rx_bad) and is otherwise ignored.
    pub fn on_frame(&mut self, sender: PeerAddress, bytes: &[u8]) {
        self.last_sender = Some(sender);
        match A::Command::decode(bytes) {
            Ok(command) => {
                self.rx_good += 1;
                self.actuator.actuate(&command);
            }
            Err(_e) => {
                self.rx_bad += 1;
                #[cfg(feature = "log")]
                log::warn!("dropping frame from {}: {}", sender, _e);
            }
        }
    }

    /// The sender address of the most recent frame, well-formed or not.
    pub fn last_sender(&self) -> Option<PeerAddress> {
        self.last_sender
    }

    /// Shared access to the actuator.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Exclusive access to the actuator.
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }
}

/// Drives a binary output pin from [`LedCommand`] frames.
#[derive(Debug)]
pub struct LedActuator<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> LedActuator<P> {
    /// Wraps the output pin. The pin is expected to start at its off
    /// level; the actuator only changes it on received commands.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Releases the wrapped pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Actuator for LedActuator<P> {
    type Command = LedCommand;

    fn actuate(&mut self, command: &LedCommand) {
        if command.on {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
    }
}

/// Drives a motor driver (direction pin + PWM duty) from [`SpeedCommand`]
/// frames.
///
/// The duty cycle is the fraction `|speed| / 255`; the direction pin is
/// high for forward (speed >= 0) and low for reverse.
#[derive(Debug)]
pub struct MotorActuator<D: OutputPin, P: SetDutyCycle> {
    direction: D,
    pwm: P,
}

impl<D: OutputPin, P: SetDutyCycle> MotorActuator<D, P> {
    /// Wraps the direction pin and the PWM channel.
    pub fn new(direction: D, pwm: P) -> Self {
        Self { direction, pwm }
    }
}

impl<D: OutputPin, P: SetDutyCycle> Actuator for MotorActuator<D, P> {
    type Command = SpeedCommand;

    fn actuate(&mut self, command: &SpeedCommand) {
        if command.speed >= 0 {
            let _ = self.direction.set_high();
        } else {
            let _ = self.direction.set_low();
        }
        // Decode only checks the frame length, so the field can carry any
        // i16; saturate before forming the duty fraction.
        let magnitude = command.speed.unsigned_abs().min(crate::consts::SPEED_MAX as u16);
        let _ = self
            .pwm
            .set_duty_cycle_fraction(magnitude, crate::consts::SPEED_MAX as u16);
    }
}

/// Retains the most recent [`TextCommand`] and logs it.
#[derive(Debug, Default)]
pub struct TextActuator {
    last: Option<TextCommand>,
}

impl TextActuator {
    /// Creates the actuator with no message retained.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently received text command.
    pub fn last(&self) -> Option<&TextCommand> {
        self.last.as_ref()
    }
}

impl Actuator for TextActuator {
    type Command = TextCommand;

    fn actuate(&mut self, command: &TextCommand) {
        #[cfg(feature = "log")]
        if let Some(text) = command.as_str() {
            log::info!("message: {}", text);
        }
        self.last = Some(*command);
    }
}

/// Retains the latest [`DualCounter`] values for a display.
#[derive(Debug, Default)]
pub struct CounterActuator {
    latest: DualCounter,
}

impl CounterActuator {
    /// Creates the actuator with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest received counter pair.
    pub fn latest(&self) -> DualCounter {
        self.latest
    }
}

impl Actuator for CounterActuator {
    type Command = DualCounter;

    fn actuate(&mut self, command: &DualCounter) {
        self.latest = *command;
    }
}
