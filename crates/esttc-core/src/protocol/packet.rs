//! Frame encoding/decoding
//!
//! Wraps an ESTTC payload in the over-the-air envelope. The CRC covers the
//! length byte and the payload, NOT the preamble or sync word.

use byteorder::{BigEndian, ByteOrder};

use super::{
    Crc16, ProtocolError, CHECKSUM_SIZE, FRAME_OVERHEAD, MAX_PAYLOAD_SIZE, PREAMBLE, SYNC,
};

/// Offset of the sync word within a frame
const SYNC_OFFSET: usize = PREAMBLE.len();

/// Offset of the length byte within a frame
const LENGTH_OFFSET: usize = SYNC_OFFSET + 1;

/// Offset of the first payload byte within a frame
const PAYLOAD_OFFSET: usize = LENGTH_OFFSET + 1;

/// A complete ESTTC frame
///
/// Immutable once built: the checksum and the encoded bytes are derived from
/// the payload and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Vec<u8>,
    checksum: u16,
    encoded: Vec<u8>,
}

impl Frame {
    /// Build a frame around `payload`
    pub fn build(payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let length = payload.len() as u8;
        let checksum = checksum(length, payload);

        let mut encoded = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
        encoded.extend_from_slice(&PREAMBLE);
        encoded.push(SYNC);
        encoded.push(length);
        encoded.extend_from_slice(payload);

        // CRC (2 bytes, big-endian)
        let mut crc_bytes = [0u8; CHECKSUM_SIZE];
        BigEndian::write_u16(&mut crc_bytes, checksum);
        encoded.extend_from_slice(&crc_bytes);

        tracing::debug!(length, checksum, "Built ESTTC frame");

        Ok(Self {
            payload: payload.to_vec(),
            checksum,
            encoded,
        })
    }

    /// Decode and verify a frame from raw bytes
    ///
    /// Trailing bytes after the checksum are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < FRAME_OVERHEAD {
            return Err(ProtocolError::Truncated {
                needed: FRAME_OVERHEAD,
                actual: data.len(),
            });
        }

        if data[..SYNC_OFFSET] != PREAMBLE {
            return Err(ProtocolError::BadPreamble);
        }

        if data[SYNC_OFFSET] != SYNC {
            return Err(ProtocolError::BadSync {
                found: data[SYNC_OFFSET],
            });
        }

        let length = data[LENGTH_OFFSET];
        let needed = FRAME_OVERHEAD + length as usize;
        if data.len() < needed {
            return Err(ProtocolError::Truncated {
                needed,
                actual: data.len(),
            });
        }

        let payload_end = PAYLOAD_OFFSET + length as usize;
        let payload = &data[PAYLOAD_OFFSET..payload_end];
        let received = BigEndian::read_u16(&data[payload_end..payload_end + CHECKSUM_SIZE]);

        let expected = checksum(length, payload);
        if received != expected {
            return Err(ProtocolError::CrcMismatch {
                expected,
                actual: received,
            });
        }

        Self::build(payload)
    }

    /// The payload carried by this frame
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Value of the length field
    pub fn length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// CRC16 over length + payload
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The complete on-air byte sequence
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Consume the frame, returning the on-air bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.encoded
    }

    /// Get the total encoded size
    pub fn encoded_size(&self) -> usize {
        self.encoded.len()
    }

    /// Encoded frame as an uppercase hex string (for logs and dry runs)
    pub fn to_hex(&self) -> String {
        to_hex(&self.encoded)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.encoded
    }
}

/// Build a frame around `payload`
pub fn build_frame(payload: &[u8]) -> Result<Frame, ProtocolError> {
    Frame::build(payload)
}

/// Uppercase hex rendering of raw bytes
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// CRC16 of the length byte followed by the payload
fn checksum(length: u8, payload: &[u8]) -> u16 {
    Crc16::new().update(&[length]).update(payload).finalize()
}
