//! Metering configuration trait.

use crate::BatchMode;

/// Configuration consumed by the batching engine.
#[auto_impl::auto_impl(&, Arc)]
pub trait MeteringConfig: Send + Sync {
    /// How batches are flushed.
    fn mode(&self) -> BatchMode;

    /// Flush probability per call in [`BatchMode::Sampled`].
    fn sample_probability(&self) -> f64;

    /// Fixed seed for the sampling draw. `None` seeds from the OS.
    fn sample_seed(&self) -> Option<u64>;

    /// Funding level below which a low-funds warning is logged after each
    /// consumption. Zero disables the warning.
    fn low_funds_threshold(&self) -> u64;
}
