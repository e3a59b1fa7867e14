//! ESTTC Link Protocol
//!
//! Implements the EnduroSat ESTTC over-the-air command framing.
//!
//! Frame format:
//! - 5 bytes: Preamble (`0xAA` repeated)
//! - 1 byte: Sync word (`0x7E`)
//! - 1 byte: Payload length
//! - N bytes: Payload (ESTTC ASCII command)
//! - 2 bytes: CRC16/CCITT-FALSE of length + payload (big-endian)

pub mod commands;
pub mod crc;
mod error;
mod packet;

pub use commands::{Command, Selection};
pub use crc::{crc16, Crc16};
pub use error::{ProtocolError, UnknownCommand};
pub use packet::{build_frame, to_hex, Frame};

/// Preamble sent ahead of every frame
pub const PREAMBLE: [u8; 5] = [0xAA; 5];

/// Sync word marking the start of the length field
pub const SYNC: u8 = 0x7E;

/// Size of the length field in bytes
pub const LENGTH_SIZE: usize = 1;

/// Size of the trailing checksum in bytes
pub const CHECKSUM_SIZE: usize = 2;

/// Fixed bytes surrounding the payload (preamble, sync, length, checksum)
pub const FRAME_OVERHEAD: usize = PREAMBLE.len() + 1 + LENGTH_SIZE + CHECKSUM_SIZE;

/// Largest payload the one-byte length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Largest payload the radio accepts in a single ESTTC packet.
/// Used for link timing, not for framing validation.
pub const MAX_ESTTC_PAYLOAD: usize = 128;
