use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use stopwait::channel;
use stopwait::receiver;

/// A channel with no impairment and a fixed seed.
pub fn clean_channel() -> channel::Channel {
    channel::Channel::new(channel::Config::default(), StdRng::seed_from_u64(0))
}

pub fn channel_with(config: channel::Config, seed: u64) -> channel::Channel {
    channel::Channel::new(config, StdRng::seed_from_u64(seed))
}

/// A receiver loop running on its own thread until stopped.
pub struct ReceiverHandle {
    addr: SocketAddr,
    running: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

pub fn spawn_receiver(port: u16, frame_size: usize) -> ReceiverHandle {
    let config = receiver::Config {
        bind_port: port,
        frame_size,
    };

    let mut rx = receiver::Receiver::bind(config, clean_channel()).expect("failed to bind receiver");
    let addr = rx.local_addr();

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);

    let join = thread::spawn(move || {
        rx.run(&r).expect("receiver loop failed");
    });

    ReceiverHandle {
        addr,
        running,
        join: Some(join),
    }
}

impl ReceiverHandle {
    /// Loopback address a sender can target.
    pub fn dest_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.addr.port()))
    }

    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(join) = self.join.take() {
            join.join().expect("receiver thread panicked");
        }
    }
}
