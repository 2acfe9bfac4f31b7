//! Batching metrics.

use metrics::{Counter, Gauge};

/// Counters for the batch accumulator.
#[derive(Clone, Debug)]
pub(crate) struct BatchMetrics {
    /// Number of registered calls
    pub(crate) calls_registered_total: Counter,
    /// Number of flushed batches
    pub(crate) batches_flushed_total: Counter,
    /// Sum of all flushed batch amounts
    pub(crate) batch_units_flushed_total: Counter,
    /// Amount pending in the current batch
    pub(crate) pending_units: Gauge,
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self {
            calls_registered_total: metrics::counter!("metering.calls_registered_total"),
            batches_flushed_total: metrics::counter!("metering.batches_flushed_total"),
            batch_units_flushed_total: metrics::counter!("metering.batch_units_flushed_total"),
            pending_units: metrics::gauge!("metering.pending_units"),
        }
    }
}

impl BatchMetrics {
    /// Record one registered call.
    pub(crate) fn record_call(&self, pending: u64) {
        self.calls_registered_total.increment(1);
        self.pending_units.set(pending as f64);
    }

    /// Record one flushed batch.
    pub(crate) fn record_flush(&self, batch_sum: u64) {
        self.batches_flushed_total.increment(1);
        self.batch_units_flushed_total.increment(batch_sum);
        self.pending_units.set(0.0);
    }
}
