//! Protocol errors

use thiserror::Error;

/// Errors that can occur while building or decoding frames
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Payload too large: {len} bytes (maximum {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Frame truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("Invalid preamble")]
    BadPreamble,

    #[error("Invalid sync word: expected 0x7e, got {found:#04x}")]
    BadSync { found: u8 },

    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch { expected: u16, actual: u16 },
}

/// Error returned when a command name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);
