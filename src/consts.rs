//! Constants used across the control-link implementation.
//!
//! This module defines the design constants shared by the sampler, the
//! speed model, the codec, and the link manager.
//!
//! ## Key Concepts
//!
//! - **Debounce Window**: minimum quiet time between accepted input edges.
//! - **Speed Bounds**: the clamped signed range the speed model may emit.
//! - **Frame Sizing**: the largest fixed-layout command variant determines
//!   the capacity of the link manager's owned outgoing buffer.
//! - **Outcome Queue Depth**: how many asynchronous delivery outcomes can be
//!   pending before the main loop drains them.
//!
//! These values should be used wherever sampling, clamping, or buffer logic
//! is implemented so that both ends of a deployed pair agree on them.

/// Length (in bytes) of a peer hardware address.
///
/// Matches the 6-byte station identifier used by the underlying radio
/// subsystem.
pub const PEER_ADDRESS_LEN: usize = 6;

/// Minimum time (in milliseconds) a line must hold a new level before the
/// sampler accepts the transition as a real edge.
///
/// Transitions observed inside this window are dropped, not deferred. This
/// is the intended trade-off between responsiveness and noise rejection.
pub const DEBOUNCE_WINDOW_MS: u32 = 50;

/// Amount added to (or subtracted from) the speed value per accepted
/// increment/decrement event, before clamping.
pub const SPEED_STEP: i16 = 100;

/// Upper bound of the speed model's signed value.
pub const SPEED_MAX: i16 = 255;

/// Lower bound of the speed model's signed value.
pub const SPEED_MIN: i16 = -255;

/// Capacity (in bytes) of the text command's fixed buffer, including the
/// NUL terminator.
pub const TEXT_CAPACITY: usize = 32;

/// Maximum size (in bytes) of an encoded command frame.
///
/// Sized for the largest fixed-layout variant (the NUL-padded text
/// command); every other variant encodes to fewer bytes.
pub const MAX_FRAME_LEN: usize = TEXT_CAPACITY;

/// Number of delivery outcomes that may sit in the queue between the radio
/// callback context and the main loop before new outcomes are dropped.
pub const OUTCOME_QUEUE_DEPTH: usize = 8;
