//! Flush policies.
//!
//! A policy answers one question per registered call: flush the pending
//! batch now? It never touches the batch itself.

use paygate_api::{BatchMode, MeteringConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-call flush decision.
pub trait FlushPolicy: Send {
    /// Whether the pending batch should be flushed after this call.
    fn should_flush(&mut self) -> bool;
}

impl<P: FlushPolicy + ?Sized> FlushPolicy for Box<P> {
    fn should_flush(&mut self) -> bool {
        (**self).should_flush()
    }
}

/// Flushes on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl FlushPolicy for Immediate {
    fn should_flush(&mut self) -> bool {
        true
    }
}

/// Flushes with a fixed probability per call.
///
/// Draws are independent: `rng.random::<f64>() < probability`. The random
/// source is injected so tests can seed it.
#[derive(Debug, Clone)]
pub struct Sampled<R = StdRng> {
    probability: f64,
    rng: R,
}

impl Sampled<StdRng> {
    /// Sampled policy seeded from the operating system.
    pub fn from_os_rng(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_os_rng())
    }

    /// Sampled policy with a deterministic seed.
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Sampled<R> {
    /// Sampled policy drawing from `rng`.
    pub fn with_rng(probability: f64, rng: R) -> Self {
        Self { probability, rng }
    }

    /// Flush probability per call.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl<R: Rng + Send> FlushPolicy for Sampled<R> {
    fn should_flush(&mut self) -> bool {
        self.rng.random::<f64>() < self.probability
    }
}

/// Build the policy selected by `config`.
pub fn from_config(config: &impl MeteringConfig) -> Box<dyn FlushPolicy> {
    match config.mode() {
        BatchMode::Immediate => Box::new(Immediate),
        BatchMode::Sampled => match config.sample_seed() {
            Some(seed) => Box::new(Sampled::seeded(config.sample_probability(), seed)),
            None => Box::new(Sampled::from_os_rng(config.sample_probability())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchModeArg, MeteringArgs};

    #[test]
    fn test_immediate_always_flushes() {
        let mut policy = Immediate;
        assert!((0..100).all(|_| policy.should_flush()));
    }

    #[test]
    fn test_sampled_bounds() {
        let mut never = Sampled::seeded(0.0, 7);
        assert!((0..1000).all(|_| !never.should_flush()));

        let mut always = Sampled::seeded(1.0, 7);
        assert_eq!(always.probability(), 1.0);
        assert!((0..1000).all(|_| always.should_flush()));
    }

    #[test]
    fn test_sampled_rate_is_close_to_probability() {
        let mut policy = Sampled::seeded(0.1, 42);
        let hits = (0..10_000).filter(|_| policy.should_flush()).count();

        // Expected 1000, sigma = 30.
        assert!((800..=1200).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let mut a = Sampled::seeded(0.1, 99);
        let mut b = Sampled::seeded(0.1, 99);

        let left: Vec<bool> = (0..500).map(|_| a.should_flush()).collect();
        let right: Vec<bool> = (0..500).map(|_| b.should_flush()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_from_config() {
        let mut immediate = from_config(&MeteringArgs::default());
        assert!(immediate.should_flush());

        let args = MeteringArgs {
            mode: Some(BatchModeArg::Sampled),
            sample_probability: Some(0.0),
            sample_seed: Some(1),
            ..Default::default()
        };
        let mut sampled = from_config(&args);
        assert!((0..100).all(|_| !sampled.should_flush()));
    }
}
