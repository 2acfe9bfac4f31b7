//! Batching engine for pay-per-call metering.
//!
//! Calls register their price with a [`BatchAccumulator`]. A [`FlushPolicy`]
//! decides after each call whether the pending batch is flushed; a flush
//! resets the running sum and hands one [`BatchEvent`](paygate_api::BatchEvent)
//! to the [`Dispatcher`], which delivers it to every observer in order.
//!
//! # Components
//!
//! - [`FlushPolicy`] - Per-call flush decision ([`Immediate`], [`Sampled`])
//! - [`BatchAccumulator`] - Exclusive-access running sum with add/flush/reset
//! - [`Dispatcher`] - Ordered, fail-fast delivery of flushed batches
//! - [`MeteringArgs`] - CLI/config surface implementing
//!   [`MeteringConfig`](paygate_api::MeteringConfig)
//!
//! The ledger consumer lives in `paygate-consumer`.

mod accumulator;
pub mod args;
mod config;
mod constants;
mod dispatcher;
mod metrics;
pub mod policy;

pub use accumulator::BatchAccumulator;
pub use args::{BatchModeArg, MeteringArgs};
pub use config::DefaultMeteringConfig;
pub use constants::DEFAULT_SAMPLE_PROBABILITY;
pub use dispatcher::Dispatcher;
pub use policy::{FlushPolicy, Immediate, Sampled};
