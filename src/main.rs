//! Process entry for `stopwait`.
//!
//! Owns only process setup: argument parsing, logging, the interrupt
//! handler, and wall-clock timing. Protocol work happens in the library's
//! sender and receiver loops.

use std::net::ToSocketAddrs;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use stopwait::{channel, receiver, sender};

/// Stop-and-wait ARQ over UDP with a simulated lossy link.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    role: Role,

    /// Frame size in bytes.
    #[arg(long, global = true, default_value_t = 1472)]
    frame_size: usize,

    /// Simulated round-trip latency in seconds.
    #[arg(long, global = true, default_value_t = 0.0)]
    rtt: f64,

    /// Simulated loss probability in [0, 1].
    #[arg(long, global = true, default_value_t = 0.0)]
    loss: f64,

    /// Increase output verbosity (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Role {
    /// Transmit frames one at a time, waiting for each acknowledgment.
    Sender {
        /// Receiver host to send to.
        #[arg(long)]
        dest: String,

        /// Receiver port.
        #[arg(short, long)]
        port: u16,

        /// Number of frames to deliver.
        #[arg(short, long, default_value_t = 1000)]
        count: u64,

        /// Acknowledgment timeout in seconds.
        #[arg(short, long, default_value_t = 0.1)]
        timeout: f64,
    },
    /// Receive frames and acknowledge each one.
    Receiver {
        /// Local port to bind.
        #[arg(short, long)]
        port: u16,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))
        .expect("failed to install interrupt handler");

    let channel_config = channel::Config {
        loss_probability: cli.loss,
        round_trip_latency: Duration::from_secs_f64(cli.rtt),
    };
    let channel = channel::Channel::new(channel_config, StdRng::from_entropy());

    let result = match cli.role {
        Role::Sender {
            dest,
            port,
            count,
            timeout,
        } => run_sender(&dest, port, count, timeout, cli.frame_size, channel, &running),
        Role::Receiver { port } => run_receiver(port, cli.frame_size, channel, &running),
    };

    if let Err(err) = result {
        log::error!("fatal: {err}");
        process::exit(1);
    }
}

fn run_sender(
    dest: &str,
    port: u16,
    count: u64,
    timeout: f64,
    frame_size: usize,
    channel: channel::Channel,
    running: &AtomicBool,
) -> std::io::Result<()> {
    let dest_addr = (dest, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "unresolvable host"))?;

    let config = sender::Config {
        dest_addr,
        frame_count: count,
        ack_timeout: Duration::from_secs_f64(timeout),
        frame_size,
    };

    let mut sender = sender::Sender::new(config, channel)?;

    let start = Instant::now();
    let report = sender.run(running)?;
    let elapsed = start.elapsed();

    if running.load(Ordering::SeqCst) {
        log::info!(
            "{} attempts for {} delivered frames",
            report.attempts,
            report.delivered
        );
        println!("{}", elapsed.as_secs_f64());
    } else {
        log::info!("interrupted, exiting");
    }

    Ok(())
}

fn run_receiver(
    port: u16,
    frame_size: usize,
    channel: channel::Channel,
    running: &AtomicBool,
) -> std::io::Result<()> {
    let config = receiver::Config {
        bind_port: port,
        frame_size,
    };

    let mut receiver = receiver::Receiver::bind(config, channel)?;
    receiver.run(running)?;

    log::info!("interrupted, exiting");

    Ok(())
}
