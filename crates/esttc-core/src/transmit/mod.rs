//! Timed Transmission
//!
//! Repeats a framed ESTTC command towards the radio for a bounded time at a
//! bounded rate.

mod error;
mod plan;
pub mod scheduler;
pub mod sink;

pub use error::{PlanError, TransmitError};
pub use plan::{TransmissionPlan, DURATION_RANGE_SECS};
pub use scheduler::{
    run, CancelToken, Pacer, Scheduler, ThreadPacer, TransmissionReport, TransmissionSession,
};
pub use sink::{DryRunSink, PacketSink, UdpSink};

use crate::protocol::{Frame, Selection};
use crate::timing::TimingPolicy;

/// Frame and transmit the operator's selection
///
/// Returns `Ok(None)` when the operator quit: nothing is framed and the sink is
/// never touched. Otherwise `interval_ms` must be one of `policy`'s choices.
pub fn transmit_selection<P: Pacer, S: PacketSink + ?Sized>(
    selection: Selection,
    duration_secs: u32,
    policy: &TimingPolicy,
    interval_ms: u64,
    scheduler: &mut Scheduler<P>,
    sink: &mut S,
) -> Result<Option<TransmissionReport>, TransmitError> {
    let Some(payload) = selection.payload() else {
        tracing::info!("No command selected, nothing will be sent");
        return Ok(None);
    };

    if let Some(command) = selection.command() {
        tracing::info!(command = %command, "{}", command.description());
    }

    let frame = Frame::build(payload)?;
    let plan = TransmissionPlan::with_policy(duration_secs, policy, interval_ms, frame)?;
    scheduler.run(&plan, sink).map(Some)
}
