//! # ESTTC Core Library
//!
//! Command framing and timed transmission for EnduroSat UHF transceivers.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - CRC-16/CCITT-FALSE checksums
//! - The fixed ESTTC command catalog
//! - Over-the-air frame encoding and decoding
//! - Link timing limits derived from the baud rate
//! - A duration- and rate-bounded transmission scheduler
//! - Transmitter configuration
//!
//! Prompting the operator, handling signals and modulating the signal are left
//! to the front end and the SDR flowgraph.
//!
//! ## Example
//!
//! ```rust,no_run
//! use esttc_core::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = TimingPolicy::for_baud(BaudRate::B9600);
//! let frame = Frame::build(Command::ReadUptime.payload())?;
//! let plan = TransmissionPlan::new(10, policy.min_interval_ms() * 2, frame)?;
//!
//! let mut sink = UdpSink::new("127.0.0.1:52001".parse()?)?;
//! let report = Scheduler::new().run(&plan, &mut sink)?;
//! println!("Sent {} packets", report.packets_sent);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod protocol;
pub mod timing;
pub mod transmit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::TransmitterConfig;
    pub use crate::protocol::{build_frame, crc16, Command, Frame, ProtocolError, Selection};
    pub use crate::timing::{min_interval_millis, BaudRate, TimingPolicy};
    pub use crate::transmit::{
        transmit_selection, CancelToken, PacketSink, Scheduler, TransmissionPlan,
        TransmissionReport, TransmissionSession, TransmitError, UdpSink,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
