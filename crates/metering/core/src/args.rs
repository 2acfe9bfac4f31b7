//! CLI arguments for metering configuration.

use clap::Args;
use paygate_api::{BatchMode, MeteringConfig};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// CLI wrapper for [`BatchMode`] with clap integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchModeArg {
    /// Flush every call individually (default).
    #[default]
    Immediate,
    /// Flush with a fixed probability per call.
    Sampled,
}

impl From<BatchModeArg> for BatchMode {
    fn from(arg: BatchModeArg) -> Self {
        match arg {
            BatchModeArg::Immediate => BatchMode::Immediate,
            BatchModeArg::Sampled => BatchMode::Sampled,
        }
    }
}

impl From<BatchMode> for BatchModeArg {
    fn from(mode: BatchMode) -> Self {
        match mode {
            BatchMode::Immediate => BatchModeArg::Immediate,
            BatchMode::Sampled => BatchModeArg::Sampled,
        }
    }
}

/// Metering CLI arguments. Amounts are in ledger units.
///
/// Every field is optional so that only values given explicitly override a
/// lower configuration layer; unset fields fall back to the defaults when
/// read through [`MeteringConfig`].
#[derive(Debug, Default, Args, Clone, PartialEq, Serialize, Deserialize)]
#[command(next_help_heading = "Metering")]
#[serde(default)]
pub struct MeteringArgs {
    /// Batching mode [default: immediate]
    #[arg(long = "metering.mode", value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BatchModeArg>,

    /// Flush probability per call in sampled mode [default: 0.1]
    #[arg(long = "metering.sample-probability")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_probability: Option<f64>,

    /// Fixed seed for the sampling draw (random if unset)
    #[arg(long = "metering.sample-seed")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_seed: Option<u64>,

    /// Log a warning when funding drops below this amount (0 disables) [default: 0]
    #[arg(long = "metering.low-funds-threshold")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_funds_threshold: Option<u64>,
}

impl MeteringArgs {
    /// Validate argument values.
    ///
    /// Returns an error if the sample probability is outside `(0, 1]`.
    /// Sampling options are accepted but ignored in immediate mode.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(probability) = self.sample_probability {
            if !(probability > 0.0 && probability <= 1.0) {
                return Err(format!(
                    "sample-probability must be in (0, 1], got {probability}"
                ));
            }
        }

        Ok(())
    }

    /// Layer `overrides` on top of `self`, field by field.
    ///
    /// Fields set in `overrides` win; unset fields keep the value from `self`.
    pub fn merged_with(self, overrides: &MeteringArgs) -> Self {
        Self {
            mode: overrides.mode.or(self.mode),
            sample_probability: overrides.sample_probability.or(self.sample_probability),
            sample_seed: overrides.sample_seed.or(self.sample_seed),
            low_funds_threshold: overrides.low_funds_threshold.or(self.low_funds_threshold),
        }
    }
}

impl MeteringConfig for MeteringArgs {
    fn mode(&self) -> BatchMode {
        self.mode.unwrap_or_default().into()
    }

    fn sample_probability(&self) -> f64 {
        self.sample_probability.unwrap_or(DEFAULT_SAMPLE_PROBABILITY)
    }

    fn sample_seed(&self) -> Option<u64> {
        self.sample_seed
    }

    fn low_funds_threshold(&self) -> u64 {
        self.low_funds_threshold.unwrap_or(DEFAULT_LOW_FUNDS_THRESHOLD)
    }
}
