//! CRC-16/CCITT-FALSE
//!
//! The checksum EnduroSat radios expect on every ESTTC frame:
//! width 16, poly 0x1021, init 0xFFFF, no reflection, xor-out 0x0000.
//!
//! Computed bit by bit, most significant bit first. Results can be checked
//! against any standard CRC calculator (check value for "123456789" is 0x29B1).

/// Generator polynomial
pub const POLY: u16 = 0x1021;

/// Initial register value
pub const INIT: u16 = 0xFFFF;

/// Value XORed into the register before output
pub const XOR_OUT: u16 = 0x0000;

/// Incremental CRC-16/CCITT-FALSE state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    /// Start a new checksum
    pub fn new() -> Self {
        Self { register: INIT }
    }

    /// Feed more bytes into the checksum
    pub fn update(mut self, data: &[u8]) -> Self {
        for &byte in data {
            self.register ^= (byte as u16) << 8;
            for _ in 0..8 {
                if self.register & 0x8000 != 0 {
                    self.register = (self.register << 1) ^ POLY;
                } else {
                    self.register <<= 1;
                }
            }
        }
        self
    }

    /// Get the final checksum
    pub fn finalize(self) -> u16 {
        self.register ^ XOR_OUT
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate the CRC-16/CCITT-FALSE of `data`
pub fn crc16(data: &[u8]) -> u16 {
    Crc16::new().update(data).finalize()
}
