//! Sender role: a counted sequence of send / await-ack / timeout cycles
//! against a fixed destination address.

use std::io;
use std::net;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time;

use crate::channel::Channel;
use crate::endpoint::{Endpoint, RecvError};

/// Configuration for a [`Sender`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Destination address frames are sent to.
    pub dest_addr: net::SocketAddr,
    /// Number of successful round trips to complete before finishing.
    pub frame_count: u64,
    /// How long to wait for an acknowledgment before abandoning a round.
    pub ack_timeout: time::Duration,
    /// Size of each filler frame in bytes.
    pub frame_size: usize,
}

/// Outcome of a single send / await-ack round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A datagram arrived within the timeout window; the round counts.
    Acked,
    /// The timeout elapsed. The round is abandoned, not retried: the next
    /// round sends a brand-new frame, since frames carry no identity that
    /// would make retransmission meaningful.
    TimedOut,
}

/// Final tally of a sender run.
#[derive(Clone, Copy, Debug)]
pub struct Report {
    /// Total frames put through the channel, including ones whose round
    /// later timed out.
    pub attempts: u64,
    /// Rounds that completed with an acknowledgment.
    pub delivered: u64,
}

pub struct Sender {
    endpoint: Endpoint,
    ack_timeout: time::Duration,
    // Sole termination condition of the run loop
    remaining: u64,
    attempts: u64,
    delivered: u64,
}

impl Sender {
    /// Binds an ephemeral local port and fixes the peer address to the
    /// configured destination.
    pub fn new(config: Config, channel: Channel) -> io::Result<Self> {
        let mut endpoint = Endpoint::bind(("0.0.0.0", 0), config.frame_size, channel)?;
        endpoint.set_peer(config.dest_addr);

        Ok(Self {
            endpoint,
            ack_timeout: config.ack_timeout,
            remaining: config.frame_count,
            attempts: 0,
            delivered: 0,
        })
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Runs one protocol round: construct a fresh filler frame, send it, and
    /// block for up to the ack timeout. Arrival of any datagram counts as
    /// the acknowledgment and decrements the remaining count; a timeout
    /// leaves the count untouched.
    pub fn send_round(&mut self) -> io::Result<RoundOutcome> {
        let frame = self.endpoint.make_frame();
        self.endpoint.send_frame(&frame)?;
        self.attempts += 1;

        match self.endpoint.receive_frame(Some(self.ack_timeout)) {
            Ok(_ack) => {
                self.remaining = self.remaining.saturating_sub(1);
                self.delivered += 1;
                Ok(RoundOutcome::Acked)
            }
            Err(RecvError::Timeout) => {
                log::debug!("ack timeout, abandoning round");
                Ok(RoundOutcome::TimedOut)
            }
            Err(RecvError::Io(err)) => Err(err),
        }
    }

    /// Drives rounds until the remaining count reaches zero or the
    /// cancellation token clears. Timeouts are absorbed here; only I/O
    /// faults surface, and they are fatal to the run.
    pub fn run(&mut self, running: &AtomicBool) -> io::Result<Report> {
        while self.remaining > 0 && running.load(Ordering::SeqCst) {
            self.send_round()?;
        }

        if self.remaining == 0 {
            log::info!("transmission finished");
        }

        Ok(Report {
            attempts: self.attempts,
            delivered: self.delivered,
        })
    }
}
