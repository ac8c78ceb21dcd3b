//! Transport endpoint shared by both roles: one datagram socket, the
//! last-known peer address, and the fixed frame size, coupled to the channel
//! impairment model.

use std::fmt;
use std::io;
use std::net;
use std::time;

use crate::channel::Channel;
use crate::socket;

/// Fixed acknowledgment payload. The protocol never inspects ack content,
/// only its arrival, but the literal keeps the wire traffic recognizable.
pub const ACK: &[u8] = b"ACK";

/// Filler byte for constructed frames.
const FILLER_BYTE: u8 = b'1';

/// Errors produced by [`Endpoint::receive_frame`].
#[derive(Debug)]
pub enum RecvError {
    /// No datagram arrived within the configured timeout.
    Timeout,
    /// Underlying I/O fault. Unmodeled by the protocol; callers propagate it
    /// as a fatal process-level error.
    Io(io::Error),
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "no datagram within the configured timeout"),
            Self::Io(err) => write!(f, "socket I/O error: {err}"),
        }
    }
}

impl std::error::Error for RecvError {}

impl From<io::Error> for RecvError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// One datagram socket plus the state the stop-and-wait roles share.
///
/// The peer address starts out as whatever the role was constructed with:
/// the Sender fixes it to the configured destination, the Receiver leaves it
/// unset and learns it from inbound traffic. Every successful receive
/// overwrites it with the datagram's source address.
pub struct Endpoint {
    socket: socket::Socket,
    channel: Channel,
    peer_addr: Option<net::SocketAddr>,
    frame_size: usize,
}

impl Endpoint {
    pub fn bind<A>(bind_address: A, frame_size: usize, channel: Channel) -> io::Result<Self>
    where
        A: net::ToSocketAddrs,
    {
        // Acks may be longer than tiny frame sizes; size the buffer for both
        let socket = socket::bind(bind_address, frame_size.max(ACK.len()))?;

        Ok(Self {
            socket,
            channel,
            peer_addr: None,
            frame_size,
        })
    }

    pub fn set_peer(&mut self, addr: net::SocketAddr) {
        self.peer_addr = Some(addr);
    }

    pub fn peer_addr(&self) -> Option<net::SocketAddr> {
        self.peer_addr
    }

    pub fn local_addr(&self) -> net::SocketAddr {
        self.socket.local_addr()
    }

    /// Constructs a filler payload of exactly the configured frame size.
    pub fn make_frame(&self) -> Box<[u8]> {
        vec![FILLER_BYTE; self.frame_size].into_boxed_slice()
    }

    /// Sends `payload` to the current peer address, subject to the channel
    /// impairment model: the latency delay always runs, then the loss draw
    /// decides whether any bytes reach the socket at all.
    ///
    /// A simulated drop is silent from the caller's perspective; the only
    /// way the peer notices is by timing out at a higher layer.
    pub fn send_frame(&mut self, payload: &[u8]) -> io::Result<()> {
        let peer = self.peer_addr.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "no peer address to send to")
        })?;

        log::debug!("sending {} bytes to {}", payload.len(), peer);

        self.channel.maybe_delay();

        if self.channel.should_deliver() {
            self.socket.send_to(payload, &peer)?;
        } else {
            log::debug!("frame to {} dropped by channel", peer);
        }

        Ok(())
    }

    /// Blocks until a datagram arrives, records its source as the new peer
    /// address, and returns the payload bytes. With a timeout configured,
    /// fails with [`RecvError::Timeout`] once it elapses; with `None` the
    /// call blocks indefinitely.
    pub fn receive_frame(
        &mut self,
        timeout: Option<time::Duration>,
    ) -> Result<Box<[u8]>, RecvError> {
        match self.socket.wait_for_frame(timeout)? {
            Some((frame_bytes, sender_addr)) => {
                log::debug!("received {} bytes from {}", frame_bytes.len(), sender_addr);
                self.peer_addr = Some(sender_addr);
                Ok(frame_bytes.into())
            }
            None => Err(RecvError::Timeout),
        }
    }
}
