//! Receiver role: an unbounded receive / acknowledge cycle bound to a local
//! port. Every inbound datagram is acked to its source address, whatever it
//! contains.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time;

use crate::channel::Channel;
use crate::endpoint::{Endpoint, RecvError, ACK};

// Wakeup interval for observing the cancellation token while blocked on the
// socket. Not a protocol timeout; the receiver never times out a peer.
const CANCEL_POLL_INTERVAL: time::Duration = time::Duration::from_millis(200);

/// Configuration for a [`Receiver`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Local port to bind. Port 0 lets the OS pick one.
    pub bind_port: u16,
    /// Size of the frames the peer is expected to send, in bytes.
    pub frame_size: usize,
}

pub struct Receiver {
    endpoint: Endpoint,
}

impl Receiver {
    pub fn bind(config: Config, channel: Channel) -> io::Result<Self> {
        let endpoint = Endpoint::bind(("0.0.0.0", config.bind_port), config.frame_size, channel)?;
        Ok(Self { endpoint })
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.endpoint.local_addr()
    }

    /// Receives and acknowledges frames until the cancellation token clears.
    /// The peer address is relearned from every inbound datagram, so acks
    /// always go to whichever address last sent something. There is no
    /// notion of a malformed frame: anything that arrives gets an ack,
    /// subject to the channel impairment model like every other send.
    pub fn run(&mut self, running: &AtomicBool) -> io::Result<()> {
        log::info!(
            "waiting for frames on port {}",
            self.endpoint.local_addr().port()
        );

        while running.load(Ordering::SeqCst) {
            match self.endpoint.receive_frame(Some(CANCEL_POLL_INTERVAL)) {
                Ok(_frame) => self.endpoint.send_frame(ACK)?,
                // Just a cancellation check wakeup, keep blocking
                Err(RecvError::Timeout) => continue,
                Err(RecvError::Io(err)) => return Err(err),
            }
        }

        Ok(())
    }
}
