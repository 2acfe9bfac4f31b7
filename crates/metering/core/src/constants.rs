//! Default constants for metering.

/// Default flush probability per call in sampled mode.
pub const DEFAULT_SAMPLE_PROBABILITY: f64 = 0.10;

/// Default low-funds warning threshold (disabled).
pub(crate) const DEFAULT_LOW_FUNDS_THRESHOLD: u64 = 0;
