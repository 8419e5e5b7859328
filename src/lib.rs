//! # nowlink
//!
//! A portable, no_std core for a point-to-point wireless control link
//! between two small embedded nodes: a transmitter sampling local input
//! (serial command characters or debounced buttons) and a receiver
//! actuating an output (LED or motor driver) from decoded commands.
//!
//! The crate implements the link-independent logic:
//! - a debounced input-sampling state machine with a refractory window
//! - a bounded signed speed model with directional reset and clamping
//! - compact fixed-layout command codecs shared verbatim by both ends
//! - an unreliable, connectionless send path with asynchronous
//!   per-message delivery outcomes and no retry
//!
//! Radio bring-up, peer-table plumbing, console I/O, and pin-level GPIO
//! drivers stay on the platform side, reached through `embedded-hal`
//! traits and the [`link::Radio`] collaborator trait.
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Disables `#![no_std]` and enables the host `critical-section` implementation for tests |
//! | `defmt-0-3`  | Derives `defmt` formatting on public types |
//! | `log`        | Emits diagnostic `log` records from the link and dispatcher |
//!
//! ## Usage
//!
//! ```rust
//! use nowlink::link::{DeliveryOutcome, LinkManager, OutcomeQueue, Peer, PeerAddress, Radio};
//! use nowlink::message::LedCommand;
//!
//! struct Loopback {
//!     frames: Vec<(PeerAddress, Vec<u8>)>,
//! }
//!
//! impl Radio for Loopback {
//!     type Error = ();
//!
//!     fn register_peer(&mut self, _peer: &Peer) -> Result<(), ()> {
//!         Ok(())
//!     }
//!
//!     fn transmit(&mut self, address: &PeerAddress, frame: &[u8]) -> Result<(), ()> {
//!         self.frames.push((*address, frame.to_vec()));
//!         Ok(())
//!     }
//! }
//!
//! let peer = PeerAddress([0x08, 0xD1, 0xF9, 0xEC, 0xFB, 0x34]);
//! let outcomes = OutcomeQueue::new();
//! let mut link = LinkManager::new(Loopback { frames: Vec::new() }, &outcomes);
//! link.configure_peer(Peer::new(peer))?;
//! link.send(&LedCommand { on: true })?;
//!
//! // Later, from the radio stack's send callback:
//! let _ = outcomes.record(DeliveryOutcome { peer, delivered: true });
//! assert!(link.poll_outcome().unwrap().delivered);
//! # Ok::<(), nowlink::link::LinkError<()>>(())
//! ```
//!
//! ## Integration Notes
//!
//! - The main loop is the single owner of sampler and model state; the
//!   radio stack's callbacks only push [`link::DeliveryOutcome`]s and
//!   deliver frames to [`dispatch::Dispatcher::on_frame`]. Neither
//!   callback may mutate sampler or model state.
//! - The wire format carries no variant tag: transmitter and receiver of
//!   a deployed pair must be built for the same command variant.
//! - On `no_std` targets a `critical-section` implementation must be
//!   provided by the platform crate (it guards the outcome queue).
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;

pub mod consts;
pub mod debounce;
pub mod dispatch;
pub mod link;
pub mod message;
pub mod node;
pub mod speed;
