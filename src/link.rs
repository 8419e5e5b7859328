//! Peer bookkeeping and fire-and-forget frame transmission.
//!
//! [`LinkManager`] owns the one registered [`Peer`] and the outgoing frame
//! buffer. [`send`](LinkManager::send) encodes a command into that owned
//! buffer (copy-at-send, so the main loop never mutates bytes the radio
//! stack is still reading) and hands the frame to the platform's
//! [`Radio`] collaborator exactly once: no retry, no blocking, no
//! acknowledgement beyond the asynchronous delivery outcome.
//!
//! ## Delivery outcomes
//!
//! The radio stack reports the fate of each hand-off later, from its own
//! execution context, exactly once per send and with no ordering guarantee
//! between in-flight sends. Rather than running application logic inside
//! that foreign context, the send callback pushes a [`DeliveryOutcome`]
//! into an [`OutcomeQueue`] and the main loop drains it with
//! [`poll_outcome`](LinkManager::poll_outcome). The queue is guarded with
//! `critical_section`, so pushes may safely preempt the main loop.
//!
//! ## Failure policy
//!
//! A failed peer registration leaves no peer configured and every
//! subsequent send fails with [`LinkError::NoPeer`]: an unaddressed peer is
//! a configuration bug, so the link halts transmission rather than
//! silently degrading. A failed delivery is not retried — the next accepted
//! input event naturally re-sends the current state.

use crate::consts::{MAX_FRAME_LEN, OUTCOME_QUEUE_DEPTH, PEER_ADDRESS_LEN};
use crate::message::{CodecError, Wire};
use core::cell::RefCell;
use core::fmt;
use critical_section::Mutex;
use heapless::{Deque, Vec};
use thiserror::Error;

/// Six-byte hardware identifier of a radio peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PeerAddress(
    /// The raw address bytes, most significant octet first.
    pub [u8; PEER_ADDRESS_LEN],
);

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// The remote end of the link, as registered with the radio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Peer {
    /// Hardware address of the remote node. Must be set before any send.
    pub address: PeerAddress,
    /// Radio channel, or `None` to let the subsystem pick the current one.
    pub channel: Option<u8>,
    /// Whether the radio subsystem should encrypt frames to this peer.
    pub encrypted: bool,
}

impl Peer {
    /// A peer on the unspecified channel without encryption, matching the
    /// usual bring-up defaults.
    pub fn new(address: PeerAddress) -> Self {
        Self {
            address,
            channel: None,
            encrypted: false,
        }
    }
}

/// Radio-level fate of one transmitted frame.
///
/// Reports only that the link layer believes the frame was handed off and
/// radio-acknowledged or not — not that the remote actuator processed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DeliveryOutcome {
    /// The peer the frame was addressed to.
    pub peer: PeerAddress,
    /// Whether the radio layer considers the attempt delivered.
    pub delivered: bool,
}

/// Interrupt-safe queue carrying delivery outcomes from the radio stack's
/// send callback into the main loop.
///
/// The callback context calls [`record`](OutcomeQueue::record); the main
/// loop drains via [`LinkManager::poll_outcome`]. Allocate one per node and
/// share it by reference with the callback glue.
pub struct OutcomeQueue {
    queue: Mutex<RefCell<Deque<DeliveryOutcome, OUTCOME_QUEUE_DEPTH>>>,
}

impl Default for OutcomeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeQueue {
    /// Creates an empty queue. `const`, so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Pushes one outcome from the radio callback context.
    ///
    /// Returns `false` if the queue was full and the outcome was dropped;
    /// the main loop has fallen at least [`OUTCOME_QUEUE_DEPTH`] sends
    /// behind at that point.
    pub fn record(&self, outcome: DeliveryOutcome) -> bool {
        critical_section::with(|cs| {
            self.queue
                .borrow_ref_mut(cs)
                .push_back(outcome)
                .is_ok()
        })
    }

    /// Pops the oldest pending outcome, if any.
    pub fn pop(&self) -> Option<DeliveryOutcome> {
        critical_section::with(|cs| self.queue.borrow_ref_mut(cs).pop_front())
    }
}

impl fmt::Debug for OutcomeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeQueue").finish_non_exhaustive()
    }
}

/// The platform's radio bring-up collaborator.
///
/// Implemented against the actual radio subsystem (ESP-NOW style) on
/// hardware, and by in-memory fakes in host tests. Both operations are
/// synchronous hand-offs only; the core treats the collaborator as
/// unreliable and non-blocking.
pub trait Radio {
    /// Error type surfaced by the radio subsystem.
    type Error;

    /// Registers a peer in the subsystem's peer table.
    fn register_peer(&mut self, peer: &Peer) -> Result<(), Self::Error>;

    /// Hands one encoded frame to the subsystem for a single transmission
    /// attempt. Must not block waiting for the delivery outcome.
    fn transmit(&mut self, address: &PeerAddress, frame: &[u8]) -> Result<(), Self::Error>;
}

/// Errors surfaced by the link manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError<E> {
    /// `send` was called before a peer was successfully configured.
    #[error("no peer configured")]
    NoPeer,
    /// The radio subsystem rejected the peer registration. Fatal to
    /// transmission until a registration succeeds.
    #[error("peer registration rejected by the radio subsystem")]
    PeerRegistration(
        /// The subsystem's own error.
        E,
    ),
    /// The radio subsystem rejected the synchronous frame hand-off.
    #[error("radio rejected the frame hand-off")]
    Transmit(
        /// The subsystem's own error.
        E,
    ),
    /// The command could not be encoded.
    #[error("codec failure: {0}")]
    Codec(
        /// The underlying codec failure.
        #[from]
        CodecError,
    ),
}

/// Owns the registered peer and the outgoing frame buffer for one node.
///
/// Constructed once per node and driven from the main loop; the only state
/// it shares with the radio callback context is the [`OutcomeQueue`].
#[derive(Debug)]
pub struct LinkManager<'q, R: Radio> {
    /// The platform radio collaborator.
    pub radio: R,
    peer: Option<Peer>,
    tx_buf: Vec<u8, MAX_FRAME_LEN>,
    outcomes: &'q OutcomeQueue,

    /// Frames successfully handed to the radio subsystem.
    pub tx_good: u16,
    /// Synchronous hand-off rejections.
    pub tx_bad: u16,
    /// Asynchronous outcomes reporting a delivered frame.
    pub delivery_good: u16,
    /// Asynchronous outcomes reporting a failed delivery.
    pub delivery_bad: u16,
}

impl<'q, R: Radio> LinkManager<'q, R> {
    /// Creates a link manager with no peer configured.
    pub fn new(radio: R, outcomes: &'q OutcomeQueue) -> Self {
        Self {
            radio,
            peer: None,
            tx_buf: Vec::new(),
            outcomes,
            tx_good: 0,
            tx_bad: 0,
            delivery_good: 0,
            delivery_bad: 0,
        }
    }

    /// Registers `peer` with the radio subsystem and adopts it as the
    /// active peer.
    ///
    /// On failure no peer is configured and every subsequent
    /// [`send`](LinkManager::send) fails with [`LinkError::NoPeer`].
    pub fn configure_peer(&mut self, peer: Peer) -> Result<(), LinkError<R::Error>> {
        match self.radio.register_peer(&peer) {
            Ok(()) => {
                self.peer = Some(peer);
                Ok(())
            }
            Err(e) => {
                self.peer = None;
                Err(LinkError::PeerRegistration(e))
            }
        }
    }

    /// The currently configured peer, if registration succeeded.
    pub fn peer(&self) -> Option<&Peer> {
        self.peer.as_ref()
    }

    /// Encodes `message` into the owned buffer and hands it to the radio
    /// for a single transmission attempt.
    ///
    /// Returns as soon as the hand-off completes; the delivery outcome
    /// arrives later through [`poll_outcome`](LinkManager::poll_outcome).
    pub fn send<M: Wire>(&mut self, message: &M) -> Result<(), LinkError<R::Error>> {
        let address = self.peer.as_ref().ok_or(LinkError::NoPeer)?.address;

        self.tx_buf.clear();
        if self.tx_buf.resize_default(M::WIRE_LEN).is_err() {
            return Err(LinkError::Codec(CodecError::BufferTooSmall {
                capacity: MAX_FRAME_LEN,
                needed: M::WIRE_LEN,
            }));
        }
        let len = message.encode(&mut self.tx_buf)?;

        match self.radio.transmit(&address, &self.tx_buf[..len]) {
            Ok(()) => {
                self.tx_good += 1;
                #[cfg(feature = "log")]
                log::debug!("handed {} byte frame to {}", len, address);
                Ok(())
            }
            Err(e) => {
                self.tx_bad += 1;
                Err(LinkError::Transmit(e))
            }
        }
    }

    /// Drains one pending delivery outcome, updating the delivery
    /// counters.
    ///
    /// Call repeatedly from the main loop until it returns `None`.
    pub fn poll_outcome(&mut self) -> Option<DeliveryOutcome> {
        let outcome = self.outcomes.pop()?;
        if outcome.delivered {
            self.delivery_good += 1;
        } else {
            self.delivery_bad += 1;
            #[cfg(feature = "log")]
            log::warn!("delivery to {} failed", outcome.peer);
        }
        Some(outcome)
    }
}
