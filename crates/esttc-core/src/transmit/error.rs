//! Transmission errors

use thiserror::Error;

use crate::protocol::ProtocolError;
use crate::timing::TimingError;

/// Errors rejecting a transmission plan before it runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Duration {0}s out of range (0-300)")]
    DurationOutOfRange(u32),

    #[error("Interval must be greater than zero")]
    ZeroInterval,
}

/// Errors that end a transmission
#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("Packet sink failed after {packets_sent} packets: {source}")]
    Sink {
        packets_sent: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Framing error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid plan: {0}")]
    Plan(#[from] PlanError),

    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),
}
