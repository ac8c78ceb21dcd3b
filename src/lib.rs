/*

Stopwait implements the textbook stop-and-wait ARQ discipline over UDP, with
an artificial channel impairment model in front of the socket. It exists to
demonstrate and benchmark reliable-delivery behavior on a lossy link, not to
be a production transport.

# Protocol

A Sender transmits one fixed-size filler frame at a time and blocks until any
datagram arrives back within a configured timeout. The Receiver acknowledges
every frame it sees with a short fixed literal. The Sender treats the arrival
of any datagram after a send as the acknowledgment; ack content is never
inspected, only its arrival within the timeout window matters.

Frames carry no sequence numbers, so the protocol cannot distinguish a stale
ack from a fresh one, nor detect duplicate delivery. A timed-out round is
abandoned rather than retried: the next round sends a brand-new frame. Both
are deliberate limitations of the modeled protocol and are preserved as-is.
The consequence is that the number of send attempts can exceed the configured
frame count under loss, while the number of successful round trips always
equals it exactly.

# Channel impairment

Every send first sleeps for half the configured round-trip latency (modeling
one-way propagation, applied even to frames that will be dropped), then draws
one uniform value in [0,1) and transmits only if the draw exceeds the loss
probability. A loss probability of 1.0 therefore drops everything; 0.0
delivers everything except in the measure-zero event of a draw of exactly
0.0. Dropped frames write no bytes to the socket; the peer simply times out.

# Peer addressing

The Sender's peer address is fixed at construction. The Receiver learns its
peer dynamically: every received datagram overwrites the peer address, and
acks always target whichever address most recently sent something. Correct
for a single client; concurrent senders would misroute acks (out of scope).

*/

pub mod channel;
pub mod endpoint;
pub mod receiver;
pub mod sender;
mod socket;

pub use endpoint::{Endpoint, RecvError, ACK};
pub use receiver::Receiver;
pub use sender::{RoundOutcome, Sender};
