//! Packet sinks
//!
//! A sink delivers one complete frame per call. Delivery is fire-and-forget:
//! nothing is read back, and an `Err` only means the local send failed.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use crate::protocol::to_hex;

/// Something that can carry framed packets towards the radio
pub trait PacketSink {
    /// Send one complete frame
    fn send(&mut self, frame: &[u8]) -> io::Result<()>;
}

impl<S: PacketSink + ?Sized> PacketSink for &mut S {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).send(frame)
    }
}

impl<S: PacketSink + ?Sized> PacketSink for Box<S> {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).send(frame)
    }
}

/// Sends each frame as a single UDP datagram
///
/// The usual destination is the modulator flowgraph listening on
/// `127.0.0.1:52001`, which turns the datagram into RF.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpSink {
    /// Bind an ephemeral local socket that sends to `destination`
    pub fn new(destination: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if destination.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).map_err(|e| {
            tracing::error!(error = %e, "Failed to bind UDP socket");
            e
        })?;

        tracing::debug!(
            local = ?socket.local_addr().ok(),
            destination = %destination,
            "UDP sink ready"
        );

        Ok(Self {
            socket,
            destination,
        })
    }

    /// Where frames are sent
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Local address the socket is bound to
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl PacketSink for UdpSink {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        let sent = self.socket.send_to(frame, self.destination)?;
        if sent != frame.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("Short datagram: sent {} of {} bytes", sent, frame.len()),
            ));
        }
        Ok(())
    }
}

/// Logs frames as hex instead of sending them
///
/// Useful for checking what would go on air without a flowgraph running.
#[derive(Debug, Default)]
pub struct DryRunSink {
    sent: u64,
}

impl DryRunSink {
    /// Create a new dry-run sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames "sent" so far
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl PacketSink for DryRunSink {
    fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.sent += 1;
        tracing::info!(
            packet = self.sent,
            bytes = frame.len(),
            frame = %to_hex(frame),
            "Dry run"
        );
        Ok(())
    }
}
