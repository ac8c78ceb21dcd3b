//! Channel impairment model: a pure policy object deciding, per send
//! attempt, whether a frame reaches the wire, and injecting synthetic
//! one-way latency. Both roles send through the same model, so acks are
//! subject to loss and delay like any other frame.

use std::thread;
use std::time;

use rand::rngs::StdRng;
use rand::Rng;

/// Simulated link parameters, fixed for the lifetime of the endpoint.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Probability in [0, 1] that a given send attempt is silently dropped.
    ///
    /// A value of 1.0 drops everything. A value of 0.0 delivers everything,
    /// modulo the measure-zero case of a uniform draw of exactly 0.0.
    pub loss_probability: f64,

    /// Simulated round-trip latency; half is applied before each send.
    pub round_trip_latency: time::Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loss_probability: 0.0,
            round_trip_latency: time::Duration::ZERO,
        }
    }
}

/// The impairment model itself. The random source is injected rather than
/// sampled from a hidden global so tests can seed it deterministically.
pub struct Channel {
    config: Config,
    rng: StdRng,
}

impl Channel {
    pub fn new(config: Config, rng: StdRng) -> Self {
        Self { config, rng }
    }

    /// Suspends the caller for half the configured round-trip latency. This
    /// runs before every transmission attempt, including ones that will be
    /// dropped: it models propagation and interface delay, not link quality.
    pub fn maybe_delay(&self) {
        if !self.config.round_trip_latency.is_zero() {
            thread::sleep(self.config.round_trip_latency / 2);
        }
    }

    /// Draws one uniform value in [0,1); the frame is delivered iff the draw
    /// exceeds the loss probability.
    pub fn should_deliver(&mut self) -> bool {
        self.rng.gen::<f64>() > self.config.loss_probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn channel_with_loss(loss_probability: f64) -> Channel {
        let config = Config {
            loss_probability,
            round_trip_latency: time::Duration::ZERO,
        };
        Channel::new(config, StdRng::seed_from_u64(0x5701_4A17))
    }

    #[test]
    fn zero_loss_always_delivers() {
        let mut channel = channel_with_loss(0.0);
        for _ in 0..10_000 {
            assert!(channel.should_deliver());
        }
    }

    #[test]
    fn total_loss_never_delivers() {
        let mut channel = channel_with_loss(1.0);
        for _ in 0..10_000 {
            assert!(!channel.should_deliver());
        }
    }

    #[test]
    fn loss_above_one_never_delivers() {
        // Draws are always < 1, so any threshold >= 1 drops everything
        let mut channel = channel_with_loss(1.5);
        for _ in 0..1_000 {
            assert!(!channel.should_deliver());
        }
    }

    #[test]
    fn partial_loss_drops_roughly_in_proportion() {
        let mut channel = channel_with_loss(0.25);
        let delivered = (0..10_000).filter(|_| channel.should_deliver()).count();
        assert!(
            delivered > 7_200 && delivered < 7_800,
            "delivered = {}",
            delivered
        );
    }

    #[test]
    fn zero_latency_does_not_sleep() {
        let channel = channel_with_loss(0.0);
        let start = time::Instant::now();
        for _ in 0..1_000 {
            channel.maybe_delay();
        }
        assert!(start.elapsed() < time::Duration::from_millis(100));
    }

    #[test]
    fn latency_sleeps_half_round_trip() {
        let config = Config {
            loss_probability: 0.0,
            round_trip_latency: time::Duration::from_millis(40),
        };
        let channel = Channel::new(config, StdRng::seed_from_u64(0));
        let start = time::Instant::now();
        channel.maybe_delay();
        assert!(start.elapsed() >= time::Duration::from_millis(20));
    }
}
