//! Fixed-layout command codecs shared by both ends of a link.
//!
//! Each command variant exchanged between a matched transmitter/receiver
//! pair has a fixed byte layout with little-endian fields, no padding, and
//! **no runtime tag**: the wire format *is* the schema. Both firmware builds
//! of a deployed pair must be configured for the same variant — decoding
//! bytes against the wrong variant's layout is undefined by design and is a
//! deployment-time contract, not something this module can check.
//!
//! ## Variants
//!
//! - [`LedCommand`]: 1 byte, a binary output level
//! - [`TextCommand`]: 32 bytes, NUL-padded text
//! - [`DualCounter`]: 8 bytes, two signed 32-bit counters
//! - [`SpeedCommand`]: 2 bytes, a signed speed in [−255, 255]
//!
//! ## Validation
//!
//! [`Wire::decode`] validates exactly one thing: the received length equals
//! the variant's [`Wire::WIRE_LEN`]. Anything else is a
//! [`CodecError::MalformedFrame`] and the frame is dropped by the caller.
//! Field values are never validated at decode time.

use crate::consts::TEXT_CAPACITY;
use thiserror::Error;

/// Errors produced while encoding or decoding command frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum CodecError {
    /// The received byte length does not match the configured variant's
    /// fixed layout. The frame is dropped; the dispatcher never crashes on
    /// it.
    #[error("malformed frame: got {actual} bytes, expected {expected}")]
    MalformedFrame {
        /// Byte length the configured variant requires.
        expected: usize,
        /// Byte length actually received.
        actual: usize,
    },
    /// The destination slice is too short to hold the encoded frame.
    #[error("encode buffer too small: {capacity} bytes, need {needed}")]
    BufferTooSmall {
        /// Capacity of the destination slice.
        capacity: usize,
        /// Bytes the variant encodes to.
        needed: usize,
    },
    /// A text payload does not leave room for its NUL terminator inside the
    /// fixed 32-byte buffer.
    #[error("text payload too long: {0} bytes, capacity 31 plus NUL")]
    TextTooLong(
        /// Length of the rejected payload.
        usize,
    ),
}

/// A fixed-layout command that can cross the wireless link.
///
/// Implementations agree byte-for-byte on exactly one layout per deployed
/// pair. `encode` writes the frame into a caller-supplied buffer (the link
/// manager's owned outgoing buffer) and `decode` rebuilds the command from
/// a received frame of exactly [`WIRE_LEN`](Wire::WIRE_LEN) bytes.
pub trait Wire: Sized {
    /// Exact size (in bytes) of this variant on the wire.
    const WIRE_LEN: usize;

    /// Encodes the command into `buf`, returning the number of bytes
    /// written (always [`WIRE_LEN`](Wire::WIRE_LEN) on success).
    fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError>;

    /// Decodes a received frame. The only runtime check is that
    /// `bytes.len()` equals [`WIRE_LEN`](Wire::WIRE_LEN).
    fn decode(bytes: &[u8]) -> Result<Self, CodecError>;
}

fn check_encode_len(capacity: usize, needed: usize) -> Result<(), CodecError> {
    if capacity < needed {
        return Err(CodecError::BufferTooSmall { capacity, needed });
    }
    Ok(())
}

fn check_decode_len(actual: usize, expected: usize) -> Result<(), CodecError> {
    if actual != expected {
        return Err(CodecError::MalformedFrame { expected, actual });
    }
    Ok(())
}

/// Binary output command for the LED transmitter/receiver pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LedCommand {
    /// `true` = output driven on, `false` = off.
    pub on: bool,
}

impl Wire for LedCommand {
    const WIRE_LEN: usize = 1;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        check_encode_len(buf.len(), Self::WIRE_LEN)?;
        buf[0] = self.on as u8;
        Ok(Self::WIRE_LEN)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        check_decode_len(bytes.len(), Self::WIRE_LEN)?;
        // A memcpy'd C bool may carry any nonzero value for true.
        Ok(Self { on: bytes[0] != 0 })
    }
}

/// Free-form text command, NUL-padded to a fixed 32-byte buffer.
///
/// The sender guarantees NUL-termination within capacity (payload of at
/// most 31 bytes); the codec itself never truncates or escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TextCommand {
    text: [u8; TEXT_CAPACITY],
}

impl TextCommand {
    /// Builds a text command from a payload of at most 31 bytes, padding
    /// the remainder with NULs.
    pub fn new(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() >= TEXT_CAPACITY {
            return Err(CodecError::TextTooLong(payload.len()));
        }
        let mut text = [0u8; TEXT_CAPACITY];
        text[..payload.len()].copy_from_slice(payload);
        Ok(Self { text })
    }

    /// The payload bytes before the first NUL (the whole buffer if the
    /// remote end never terminated it).
    pub fn payload(&self) -> &[u8] {
        let end = self
            .text
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TEXT_CAPACITY);
        &self.text[..end]
    }

    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.payload()).ok()
    }
}

impl Wire for TextCommand {
    const WIRE_LEN: usize = TEXT_CAPACITY;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        check_encode_len(buf.len(), Self::WIRE_LEN)?;
        buf[..Self::WIRE_LEN].copy_from_slice(&self.text);
        Ok(Self::WIRE_LEN)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        check_decode_len(bytes.len(), Self::WIRE_LEN)?;
        let mut text = [0u8; TEXT_CAPACITY];
        text.copy_from_slice(bytes);
        Ok(Self { text })
    }
}

/// A pair of signed event counters, one per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DualCounter {
    /// Count of accepted forward/up events.
    pub up: i32,
    /// Count of accepted backward/down events.
    pub down: i32,
}

impl Wire for DualCounter {
    const WIRE_LEN: usize = 8;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        check_encode_len(buf.len(), Self::WIRE_LEN)?;
        buf[..4].copy_from_slice(&self.up.to_le_bytes());
        buf[4..8].copy_from_slice(&self.down.to_le_bytes());
        Ok(Self::WIRE_LEN)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        check_decode_len(bytes.len(), Self::WIRE_LEN)?;
        let mut up = [0u8; 4];
        let mut down = [0u8; 4];
        up.copy_from_slice(&bytes[..4]);
        down.copy_from_slice(&bytes[4..8]);
        Ok(Self {
            up: i32::from_le_bytes(up),
            down: i32::from_le_bytes(down),
        })
    }
}

/// Signed drive-level command produced by the speed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SpeedCommand {
    /// Signed speed in [−255, 255]; the sign is the direction.
    pub speed: i16,
}

impl SpeedCommand {
    /// Builds a speed command, clamping the value into [−255, 255].
    pub fn new(speed: i16) -> Self {
        Self {
            speed: speed.clamp(crate::consts::SPEED_MIN, crate::consts::SPEED_MAX),
        }
    }
}

impl Wire for SpeedCommand {
    const WIRE_LEN: usize = 2;

    fn encode(&self, buf: &mut [u8]) -> Result<usize, CodecError> {
        check_encode_len(buf.len(), Self::WIRE_LEN)?;
        buf[..2].copy_from_slice(&self.speed.to_le_bytes());
        Ok(Self::WIRE_LEN)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        check_decode_len(bytes.len(), Self::WIRE_LEN)?;
        let mut speed = [0u8; 2];
        speed.copy_from_slice(&bytes[..2]);
        Ok(Self {
            speed: i16::from_le_bytes(speed),
        })
    }
}
