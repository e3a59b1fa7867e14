//! Link timing
//!
//! Derives how often a command may be sent without saturating the radio link.
//! The radio is half-duplex and answers every command, so each transmission
//! must leave room for the largest possible frame plus the radio's response.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::protocol::{FRAME_OVERHEAD, MAX_ESTTC_PAYLOAD};

/// Bits in the largest frame the radio accepts
pub const MAX_FRAME_BITS: u64 = ((FRAME_OVERHEAD + MAX_ESTTC_PAYLOAD) * 8) as u64;

/// Assumed radio response time, as a multiple of the frame airtime
pub const GUARD_RATIO: f64 = 1.5;

/// Number of interval choices offered (1x through 10x the minimum)
pub const MAX_INTERVAL_MULTIPLE: u8 = 10;

/// Timing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    #[error("Baud rate must be greater than zero")]
    ZeroBaudRate,

    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    #[error("Interval multiple {0} out of range (1-10)")]
    MultipleOutOfRange(u8),

    #[error("Interval {interval_ms}ms is not a 1-10x multiple of the {min_interval_ms}ms minimum")]
    IntervalNotAllowed {
        interval_ms: u64,
        min_interval_ms: u64,
    },
}

/// Radio link speeds (symbols per second; equal to bits per second for 2GFSK)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BaudRate {
    /// 600 baud
    B600,
    /// 1200 baud
    B1200,
    /// 2400 baud
    B2400,
    /// 4800 baud
    B4800,
    /// 9600 baud
    B9600,
    /// 19200 baud
    B19200,
}

impl BaudRate {
    /// All supported rates, slowest first
    pub const ALL: [BaudRate; 6] = [
        BaudRate::B600,
        BaudRate::B1200,
        BaudRate::B2400,
        BaudRate::B4800,
        BaudRate::B9600,
        BaudRate::B19200,
    ];

    /// Rate in bits per second
    pub fn bits_per_second(&self) -> u32 {
        match self {
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = TimingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        BaudRate::ALL
            .into_iter()
            .find(|rate| rate.bits_per_second() == value)
            .ok_or(TimingError::UnsupportedBaudRate(value))
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.bits_per_second()
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits_per_second())
    }
}

/// Minimum safe time between transmissions, in milliseconds
///
/// `ceil((bits + ceil(guard_ratio * bits)) * 1000 / baud)`, never less than 1.
/// Saturates at `u64::MAX` instead of overflowing.
pub fn min_interval_millis(
    bits_per_second: u32,
    max_frame_bits: u64,
    guard_ratio: f64,
) -> Result<u64, TimingError> {
    if bits_per_second == 0 {
        return Err(TimingError::ZeroBaudRate);
    }
    Ok(airtime_with_guard(bits_per_second as u64, max_frame_bits, guard_ratio))
}

fn airtime_with_guard(bits_per_second: u64, max_frame_bits: u64, guard_ratio: f64) -> u64 {
    let guard_bits = (guard_ratio * max_frame_bits as f64).ceil() as u64;
    let total_bits = max_frame_bits.saturating_add(guard_bits);
    total_bits
        .saturating_mul(1000)
        .div_ceil(bits_per_second)
        .max(1)
}

/// Interval limits for one link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingPolicy {
    baud_rate: BaudRate,
    min_interval_ms: u64,
}

impl TimingPolicy {
    /// Policy for the largest ESTTC frame at `baud_rate`
    pub fn for_baud(baud_rate: BaudRate) -> Self {
        let min_interval_ms = airtime_with_guard(
            baud_rate.bits_per_second() as u64,
            MAX_FRAME_BITS,
            GUARD_RATIO,
        );

        tracing::debug!(
            baud = baud_rate.bits_per_second(),
            min_interval_ms,
            "Derived link timing"
        );

        Self {
            baud_rate,
            min_interval_ms,
        }
    }

    /// Link speed this policy was derived for
    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    /// Shortest allowed interval
    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    /// The ten allowed intervals, shortest first
    pub fn interval_choices(&self) -> [u64; MAX_INTERVAL_MULTIPLE as usize] {
        std::array::from_fn(|i| self.min_interval_ms * (i as u64 + 1))
    }

    /// Interval for a 1-10x multiple of the minimum
    pub fn interval_for_multiple(&self, multiple: u8) -> Result<u64, TimingError> {
        if !(1..=MAX_INTERVAL_MULTIPLE).contains(&multiple) {
            return Err(TimingError::MultipleOutOfRange(multiple));
        }
        Ok(self.min_interval_ms * multiple as u64)
    }

    /// Check that `interval_ms` is one of the allowed choices
    pub fn validate_interval(&self, interval_ms: u64) -> Result<u64, TimingError> {
        if self.interval_choices().contains(&interval_ms) {
            Ok(interval_ms)
        } else {
            Err(TimingError::IntervalNotAllowed {
                interval_ms,
                min_interval_ms: self.min_interval_ms,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_frame_bits() {
        assert_eq!(MAX_FRAME_BITS, 1096);
    }

    #[test]
    fn test_known_minimums() {
        let expected = [4567, 2284, 1142, 571, 286, 143];
        for (rate, want) in BaudRate::ALL.into_iter().zip(expected) {
            assert_eq!(TimingPolicy::for_baud(rate).min_interval_ms(), want, "{rate}");
        }
    }

    #[test]
    fn test_policy_matches_free_function() {
        for rate in BaudRate::ALL {
            let direct =
                min_interval_millis(rate.bits_per_second(), MAX_FRAME_BITS, GUARD_RATIO).unwrap();
            assert_eq!(TimingPolicy::for_baud(rate).min_interval_ms(), direct);
        }
    }

    #[test]
    fn test_zero_baud_rejected() {
        assert_eq!(
            min_interval_millis(0, MAX_FRAME_BITS, GUARD_RATIO),
            Err(TimingError::ZeroBaudRate)
        );
    }

    #[test]
    fn test_never_below_one_millisecond() {
        assert_eq!(min_interval_millis(u32::MAX, 8, 0.0), Ok(1));
        assert_eq!(min_interval_millis(1000, 0, GUARD_RATIO), Ok(1));
    }

    #[test]
    fn test_huge_frame_saturates() {
        let ms = min_interval_millis(9600, u64::MAX / 100, GUARD_RATIO).unwrap();
        assert_eq!(ms, u64::MAX.div_ceil(9600));
        assert_eq!(min_interval_millis(1, u64::MAX, GUARD_RATIO), Ok(u64::MAX));
    }

    #[test]
    fn test_interval_choices() {
        let policy = TimingPolicy::for_baud(BaudRate::B9600);
        let choices = policy.interval_choices();
        assert_eq!(choices[0], 286);
        assert_eq!(choices[9], 2860);
        assert_eq!(policy.interval_for_multiple(3), Ok(858));
        assert_eq!(
            policy.interval_for_multiple(11),
            Err(TimingError::MultipleOutOfRange(11))
        );
        assert_eq!(
            policy.interval_for_multiple(0),
            Err(TimingError::MultipleOutOfRange(0))
        );
    }

    #[test]
    fn test_validate_interval() {
        let policy = TimingPolicy::for_baud(BaudRate::B1200);
        assert_eq!(policy.validate_interval(2284 * 4), Ok(2284 * 4));
        assert!(policy.validate_interval(2285).is_err());
        assert!(policy.validate_interval(2284 * 11).is_err());
    }

    #[test]
    fn test_baud_rate_conversion() {
        assert_eq!(BaudRate::try_from(4800), Ok(BaudRate::B4800));
        assert_eq!(
            BaudRate::try_from(115200),
            Err(TimingError::UnsupportedBaudRate(115200))
        );
        assert_eq!(serde_json::to_string(&BaudRate::B2400).unwrap(), "2400");
        let rate: BaudRate = serde_json::from_str("19200").unwrap();
        assert_eq!(rate, BaudRate::B19200);
    }
}
