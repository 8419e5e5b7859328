//! Transmitter-side composition: sampler → model → codec → link.
//!
//! These types wire the leaf modules together the way a node's main loop
//! uses them, so the firmware entry point reduces to bring-up plus a poll
//! loop. Two transmitter flavors exist, matching the two deployed input
//! schemes:
//!
//! - [`SpeedTransmitter`]: two debounced button lines (pull-up convention,
//!   electrical LOW = pressed) feeding the speed model; a changed value
//!   sends a fresh [`SpeedCommand`].
//! - [`LedTransmitter`]: single-character console commands toggling a
//!   remote binary output via [`LedCommand`].
//!
//! Sampler and model state are owned here and mutated only from the main
//! loop; delivery outcomes never touch them (a failed delivery is simply
//! re-sent by the next accepted input event).

use crate::debounce::{DebouncedLine, Line};
use crate::link::{LinkManager, Radio};
use crate::message::{LedCommand, SpeedCommand};
use crate::speed::{InputEvent, InvalidKey, SpeedModel, led_key};
use embedded_hal::digital::InputPin;

/// Button-driven speed transmitter node.
///
/// Owns the two input pins, their debounce state, the speed model, and the
/// link manager. Drive it by calling [`poll`](SpeedTransmitter::poll) from
/// the main loop with a monotonic millisecond timestamp.
#[derive(Debug)]
pub struct SpeedTransmitter<'q, F, B, R>
where
    F: InputPin,
    B: InputPin,
    R: Radio,
{
    forward_pin: F,
    backward_pin: B,
    forward: DebouncedLine,
    backward: DebouncedLine,
    model: SpeedModel,
    /// The link used for outgoing speed commands.
    pub link: LinkManager<'q, R>,
}

impl<'q, F, B, R> SpeedTransmitter<'q, F, B, R>
where
    F: InputPin,
    B: InputPin,
    R: Radio,
{
    /// Creates the node with both lines at their resting (released) level
    /// and the speed at `0`.
    pub fn new(forward_pin: F, backward_pin: B, link: LinkManager<'q, R>) -> Self {
        Self {
            forward_pin,
            backward_pin,
            forward: DebouncedLine::new(Line::Forward, false),
            backward: DebouncedLine::new(Line::Backward, false),
            model: SpeedModel::new(),
            link,
        }
    }

    /// The model's current value.
    pub fn speed(&self) -> i16 {
        self.model.value()
    }

    /// Samples both lines once and sends a speed command if the value
    /// changed.
    ///
    /// Event precedence per poll: both lines stable-pressed force a stop;
    /// otherwise an accepted press edge on a line steps its direction.
    /// Returns the newly sent value, or `None` when nothing was sent.
    pub fn poll(&mut self, now_ms: u32) -> Result<Option<i16>, crate::link::LinkError<R::Error>> {
        // Pull-up convention: LOW = pressed. A read failure counts as
        // released.
        let forward_pressed = self.forward_pin.is_low().unwrap_or(false);
        let backward_pressed = self.backward_pin.is_low().unwrap_or(false);

        let forward_edge = self.forward.poll(forward_pressed, now_ms);
        let backward_edge = self.backward.poll(backward_pressed, now_ms);

        let event = if self.forward.stable_level() && self.backward.stable_level() {
            Some(InputEvent::Stop)
        } else if forward_edge.is_some_and(|e| e.level) {
            Some(InputEvent::Increment)
        } else if backward_edge.is_some_and(|e| e.level) {
            Some(InputEvent::Decrement)
        } else {
            None
        };

        match event {
            Some(event) => self.apply_event(event),
            None => Ok(None),
        }
    }

    /// Applies one already-decoded input event (the serial-driven variant
    /// feeds [`InputEvent::from_key`] results here).
    ///
    /// Sends iff the model's value changed; a send failure leaves the
    /// model's new value in place, so the next change re-sends it.
    pub fn apply_event(
        &mut self,
        event: InputEvent,
    ) -> Result<Option<i16>, crate::link::LinkError<R::Error>> {
        let (value, changed) = self.model.apply(event);
        if !changed {
            return Ok(None);
        }
        self.link.send(&SpeedCommand::new(value))?;
        Ok(Some(value))
    }
}

/// Serial-driven LED transmitter node.
#[derive(Debug)]
pub struct LedTransmitter<'q, R: Radio> {
    state: LedCommand,
    /// The link used for outgoing LED commands.
    pub link: LinkManager<'q, R>,
}

impl<'q, R: Radio> LedTransmitter<'q, R> {
    /// Creates the node with the remote output assumed off.
    pub fn new(link: LinkManager<'q, R>) -> Self {
        Self {
            state: LedCommand { on: false },
            link,
        }
    }

    /// The last commanded output state.
    pub fn state(&self) -> bool {
        self.state.on
    }

    /// Decodes one console key and sends the matching command.
    ///
    /// A recognized key always sends, even when it repeats the current
    /// state. An unrecognized key yields `Ok(None)` so the console layer
    /// can print its hint; nothing is sent and no state changes.
    pub fn handle_key(
        &mut self,
        key: u8,
    ) -> Result<Option<bool>, crate::link::LinkError<R::Error>> {
        match led_key(key) {
            Ok(on) => {
                self.set_state(on)?;
                Ok(Some(on))
            }
            Err(InvalidKey(_)) => Ok(None),
        }
    }

    /// Sends the given output state to the peer and records it.
    pub fn set_state(&mut self, on: bool) -> Result<(), crate::link::LinkError<R::Error>> {
        let command = LedCommand { on };
        self.link.send(&command)?;
        self.state = command;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{DeliveryOutcome, OutcomeQueue, Peer, PeerAddress};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    const PEER: PeerAddress = PeerAddress([0x08, 0xD1, 0xF9, 0xEC, 0xFB, 0x34]);

    #[derive(Debug, Default)]
    struct FakeRadio {
        frames: Vec<Vec<u8>>,
    }

    impl Radio for FakeRadio {
        type Error = ();

        fn register_peer(&mut self, _peer: &Peer) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transmit(&mut self, _address: &PeerAddress, frame: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(frame.to_vec());
            Ok(())
        }
    }

    fn link(outcomes: &OutcomeQueue) -> LinkManager<'_, FakeRadio> {
        let mut link = LinkManager::new(FakeRadio::default(), outcomes);
        link.configure_peer(Peer::new(PEER)).unwrap();
        link
    }

    fn sent_speeds(frames: &[Vec<u8>]) -> Vec<i16> {
        frames
            .iter()
            .map(|f| i16::from_le_bytes([f[0], f[1]]))
            .collect()
    }

    #[test]
    fn presses_ramp_the_speed_and_send_each_change() {
        // Forward pressed (LOW) on three polls spaced past the window,
        // released in between; backward never pressed.
        let forward = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);
        let backward = PinMock::new(&vec![PinTransaction::get(PinState::High); 5]);
        let outcomes = OutcomeQueue::new();
        let mut node = SpeedTransmitter::new(forward, backward, link(&outcomes));

        let mut sent = Vec::new();
        for (i, now) in [0u32, 60, 120, 180, 240].iter().enumerate() {
            if let Some(value) = node.poll(*now).unwrap() {
                sent.push((i, value));
            }
        }

        assert_eq!(sent, vec![(0, 100), (2, 200), (4, 255)]);
        assert_eq!(
            sent_speeds(&node.link.radio.frames),
            vec![100, 200, 255]
        );
        node.forward_pin.done();
        node.backward_pin.done();
    }

    #[test]
    fn both_pressed_stops_and_sends_zero_once() {
        let forward = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::Low),
        ]);
        let backward = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::Low),
        ]);
        let outcomes = OutcomeQueue::new();
        let mut node = SpeedTransmitter::new(forward, backward, link(&outcomes));

        assert_eq!(node.poll(0).unwrap(), Some(100));
        assert_eq!(node.poll(60).unwrap(), Some(0));
        // Still held: no change, no re-send.
        assert_eq!(node.poll(120).unwrap(), None);
        assert_eq!(node.speed(), 0);
        assert_eq!(sent_speeds(&node.link.radio.frames), vec![100, 0]);
        node.forward_pin.done();
        node.backward_pin.done();
    }

    #[test]
    fn bounces_inside_the_window_do_not_send() {
        let forward = PinMock::new(&[
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
            PinTransaction::get(PinState::High),
        ]);
        let backward = PinMock::new(&vec![PinTransaction::get(PinState::High); 4]);
        let outcomes = OutcomeQueue::new();
        let mut node = SpeedTransmitter::new(forward, backward, link(&outcomes));

        assert_eq!(node.poll(0).unwrap(), Some(100));
        // Bounce burst within 50 ms of the accepted edge.
        assert_eq!(node.poll(10).unwrap(), None);
        assert_eq!(node.poll(20).unwrap(), None);
        assert_eq!(node.poll(30).unwrap(), None);
        assert_eq!(sent_speeds(&node.link.radio.frames), vec![100]);
        node.forward_pin.done();
        node.backward_pin.done();
    }

    #[test]
    fn delivery_failure_leaves_state_untouched_and_next_event_resends() {
        let outcomes = OutcomeQueue::new();
        let forward = PinMock::new(&[]);
        let backward = PinMock::new(&[]);
        let mut node = SpeedTransmitter::new(forward, backward, link(&outcomes));

        assert_eq!(node.apply_event(InputEvent::Increment).unwrap(), Some(100));
        // The radio reports the attempt failed, asynchronously.
        assert!(outcomes.record(DeliveryOutcome {
            peer: PEER,
            delivered: false,
        }));
        assert!(!node.link.poll_outcome().unwrap().delivered);

        // Model state is unchanged by the failure; the next accepted event
        // sends the fresh current value.
        assert_eq!(node.speed(), 100);
        assert_eq!(node.apply_event(InputEvent::Increment).unwrap(), Some(200));
        assert_eq!(sent_speeds(&node.link.radio.frames), vec![100, 200]);
        node.forward_pin.done();
        node.backward_pin.done();
    }

    #[test]
    fn led_keys_send_and_track_state() {
        let outcomes = OutcomeQueue::new();
        let mut node = LedTransmitter::new(link(&outcomes));

        assert_eq!(node.handle_key(b'u').unwrap(), Some(true));
        assert!(node.state());
        // A repeated key re-sends the same state, like the original
        // firmware.
        assert_eq!(node.handle_key(b'U').unwrap(), Some(true));
        assert_eq!(node.handle_key(b'd').unwrap(), Some(false));
        assert!(!node.state());
        assert_eq!(node.link.radio.frames, vec![vec![1], vec![1], vec![0]]);
    }

    #[test]
    fn unknown_led_key_changes_nothing() {
        let outcomes = OutcomeQueue::new();
        let mut node = LedTransmitter::new(link(&outcomes));

        assert_eq!(node.handle_key(b'x').unwrap(), None);
        assert!(!node.state());
        assert!(node.link.radio.frames.is_empty());
    }
}
