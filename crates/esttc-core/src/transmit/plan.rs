//! Transmission plans
//!
//! A plan is the validated input to one scheduler run. Front ends collect the
//! duration, interval and command however they like and hand over a plan;
//! out-of-range values are refused here, never clamped.

use std::ops::RangeInclusive;
use std::time::Duration;

use super::{PlanError, TransmitError};
use crate::protocol::Frame;
use crate::timing::TimingPolicy;

/// Accepted run durations in seconds
pub const DURATION_RANGE_SECS: RangeInclusive<u32> = 0..=300;

/// What to send, how often and for how long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionPlan {
    duration_secs: u32,
    interval_ms: u64,
    frame: Frame,
}

impl TransmissionPlan {
    /// Create a plan, rejecting out-of-range values
    pub fn new(duration_secs: u32, interval_ms: u64, frame: Frame) -> Result<Self, PlanError> {
        if !DURATION_RANGE_SECS.contains(&duration_secs) {
            return Err(PlanError::DurationOutOfRange(duration_secs));
        }
        if interval_ms == 0 {
            return Err(PlanError::ZeroInterval);
        }

        tracing::debug!(duration_secs, interval_ms, "Validated transmission plan");

        Ok(Self {
            duration_secs,
            interval_ms,
            frame,
        })
    }

    /// Create a plan whose interval must be one of the policy's choices
    pub fn with_policy(
        duration_secs: u32,
        policy: &TimingPolicy,
        interval_ms: u64,
        frame: Frame,
    ) -> Result<Self, TransmitError> {
        let interval_ms = policy.validate_interval(interval_ms)?;
        Ok(Self::new(duration_secs, interval_ms, frame)?)
    }

    /// Total transmission time in seconds
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Time between packets in milliseconds
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Time between packets
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The frame repeated on every tick
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Transmission budget in milliseconds
    pub fn budget_ms(&self) -> u64 {
        self.duration_secs as u64 * 1000
    }

    /// Number of packets a complete run sends
    ///
    /// The last packet is sent even when less than a full interval of budget
    /// remains, so this rounds up.
    pub fn expected_packets(&self) -> u64 {
        self.budget_ms().div_ceil(self.interval_ms)
    }
}
