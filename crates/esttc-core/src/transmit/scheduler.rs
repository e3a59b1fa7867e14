//! Timed transmission loop
//!
//! Sends the plan's frame once per interval until the duration budget is used
//! up. The budget is decremented *before* each send, so the packet count is
//! `ceil(duration_ms / interval_ms)` and the last packet may go out after the
//! nominal duration has elapsed. There is no retry: a failed send ends the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{PacketSink, TransmissionPlan, TransmitError};

/// Waits between transmissions
pub trait Pacer {
    /// Block for `duration`
    fn pause(&mut self, duration: Duration);
}

/// Pacer that sleeps the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Cooperative stop request for a running transmission
///
/// Checked before every send and before every pause; a pause already in
/// progress is not interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if a stop was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters for one run, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionSession {
    remaining_budget_ms: i64,
    packets_sent: u64,
}

impl TransmissionSession {
    /// Fresh session seeded from the plan's duration
    pub fn new(plan: &TransmissionPlan) -> Self {
        Self {
            remaining_budget_ms: plan.budget_ms() as i64,
            packets_sent: 0,
        }
    }

    /// Budget left; zero or negative once the run is complete
    pub fn remaining_budget_ms(&self) -> i64 {
        self.remaining_budget_ms
    }

    /// Packets handed to the sink so far
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Check if the budget is used up
    pub fn is_exhausted(&self) -> bool {
        self.remaining_budget_ms <= 0
    }

    fn consume(&mut self, interval_ms: u64) {
        let interval = i64::try_from(interval_ms).unwrap_or(i64::MAX);
        self.remaining_budget_ms = self.remaining_budget_ms.saturating_sub(interval);
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionReport {
    /// Packets handed to the sink
    pub packets_sent: u64,
    /// Whether the run stopped on a cancel request
    pub cancelled: bool,
    /// Planned duration in seconds
    pub duration_secs: u32,
    /// Interval between packets in milliseconds
    pub interval_ms: u64,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run ended
    pub finished_at: DateTime<Utc>,
}

/// Runs transmission plans against a sink
#[derive(Debug, Default)]
pub struct Scheduler<P: Pacer = ThreadPacer> {
    pacer: P,
    cancel: CancelToken,
}

impl Scheduler<ThreadPacer> {
    /// Scheduler that sleeps the calling thread between packets
    pub fn new() -> Self {
        Self::with_pacer(ThreadPacer)
    }
}

impl<P: Pacer> Scheduler<P> {
    /// Scheduler with a custom pacer
    pub fn with_pacer(pacer: P) -> Self {
        Self {
            pacer,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancel token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this scheduler's runs
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Access the pacer
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Run a plan to completion with a fresh session
    pub fn run<S: PacketSink + ?Sized>(
        &mut self,
        plan: &TransmissionPlan,
        sink: &mut S,
    ) -> Result<TransmissionReport, TransmitError> {
        let mut session = TransmissionSession::new(plan);
        self.run_session(plan, &mut session, sink)
    }

    /// Run a plan, counting into a caller-owned session
    pub fn run_session<S: PacketSink + ?Sized>(
        &mut self,
        plan: &TransmissionPlan,
        session: &mut TransmissionSession,
        sink: &mut S,
    ) -> Result<TransmissionReport, TransmitError> {
        let started_at = Utc::now();
        let frame = plan.frame().as_bytes();
        let interval = plan.interval();
        let mut cancelled = false;

        tracing::info!(
            duration_secs = plan.duration_secs(),
            interval_ms = plan.interval_ms(),
            expected_packets = plan.expected_packets(),
            frame_bytes = frame.len(),
            "Starting transmission"
        );

        while !session.is_exhausted() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            session.consume(plan.interval_ms());

            if let Err(e) = sink.send(frame) {
                tracing::error!(
                    packet = session.packets_sent + 1,
                    error = %e,
                    "Send failed, aborting transmission"
                );
                return Err(TransmitError::Sink {
                    packets_sent: session.packets_sent,
                    source: e,
                });
            }
            session.packets_sent += 1;

            tracing::trace!(
                packet = session.packets_sent,
                remaining_ms = session.remaining_budget_ms,
                "Sent packet"
            );

            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            self.pacer.pause(interval);
        }

        if cancelled {
            tracing::warn!(
                packets_sent = session.packets_sent,
                "Transmission cancelled"
            );
        } else {
            tracing::info!(packets_sent = session.packets_sent, "Transmission complete");
        }

        Ok(TransmissionReport {
            packets_sent: session.packets_sent,
            cancelled,
            duration_secs: plan.duration_secs(),
            interval_ms: plan.interval_ms(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Run a plan on the calling thread, returning the number of packets sent
pub fn run<S: PacketSink + ?Sized>(
    plan: &TransmissionPlan,
    sink: &mut S,
) -> Result<u64, TransmitError> {
    Scheduler::new()
        .run(plan, sink)
        .map(|report| report.packets_sent)
}
