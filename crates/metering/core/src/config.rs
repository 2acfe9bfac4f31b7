//! Default metering configuration (immediate mode).

use paygate_api::{BatchMode, MeteringConfig};

use crate::constants::*;

/// Default metering configuration: every call flushes immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMeteringConfig;

impl MeteringConfig for DefaultMeteringConfig {
    fn mode(&self) -> BatchMode {
        BatchMode::Immediate
    }

    fn sample_probability(&self) -> f64 {
        DEFAULT_SAMPLE_PROBABILITY
    }

    fn sample_seed(&self) -> Option<u64> {
        None
    }

    fn low_funds_threshold(&self) -> u64 {
        DEFAULT_LOW_FUNDS_THRESHOLD
    }
}
