use std::net;
use std::time;

const SOCKET_POLLING_KEY: usize = 0;

/// A UDP socket that can block for an incoming datagram with an optional
/// timeout. Both roles send and receive on the same socket from a single
/// thread, so the send and receive halves live together.
pub struct Socket {
    // Non-blocking socket; readiness is driven by the poller
    socket: net::UdpSocket,
    // Cached from socket initialization
    local_addr: net::SocketAddr,
    // Polling objects
    poller: polling::Poller,
    poller_events: polling::Events,
    // Always-allocated receive buffer
    recv_buffer: Box<[u8]>,
}

pub fn bind<A>(bind_address: A, recv_size_max: usize) -> std::io::Result<Socket>
where
    A: net::ToSocketAddrs,
{
    let socket = net::UdpSocket::bind(bind_address)?;
    socket.set_nonblocking(true)?;

    let local_addr = socket.local_addr()?;

    let poller = polling::Poller::new()?;

    unsafe {
        poller.add(&socket, polling::Event::readable(SOCKET_POLLING_KEY))?;
    }

    Ok(Socket {
        socket,
        local_addr,
        poller,
        poller_events: polling::Events::new(),
        recv_buffer: vec![0; recv_size_max].into_boxed_slice(),
    })
}

impl Socket {
    pub fn send_to(&self, frame: &[u8], addr: &net::SocketAddr) -> std::io::Result<()> {
        self.socket.send_to(frame, addr)?;
        Ok(())
    }

    /// If a datagram can be read from the socket, returns its bytes and the
    /// source address. Returns Ok(None) otherwise.
    pub fn try_read_frame(&mut self) -> std::io::Result<Option<(&[u8], net::SocketAddr)>> {
        match self.socket.recv_from(&mut self.recv_buffer) {
            Ok((frame_len, sender_addr)) => {
                let frame_bytes = &self.recv_buffer[..frame_len];
                Ok(Some((frame_bytes, sender_addr)))
            }
            Err(err) => match err.kind() {
                // The only acceptable error is WouldBlock, indicating no packet
                std::io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(err),
            },
        }
    }

    /// Blocks for a duration of up to `timeout` for an incoming datagram and
    /// returns it. Returns Ok(None) if nothing could be read in the allotted
    /// time, or if polling awoke spuriously. A timeout of `None` blocks
    /// indefinitely.
    pub fn wait_for_frame(
        &mut self,
        timeout: Option<time::Duration>,
    ) -> std::io::Result<Option<(&[u8], net::SocketAddr)>> {
        // Wait for a readable event (must be done prior to each wait() call)
        self.poller
            .modify(&self.socket, polling::Event::readable(SOCKET_POLLING_KEY))?;

        self.poller_events.clear();

        let n = self.poller.wait(&mut self.poller_events, timeout)?;

        if n > 0 {
            // The socket is readable - read in confidence
            self.try_read_frame()
        } else {
            Ok(None)
        }
    }

    pub fn local_addr(&self) -> net::SocketAddr {
        self.local_addr
    }
}
