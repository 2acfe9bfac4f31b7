//! Priced wrapper around a unit of work.

use std::future::Future;
use std::sync::Arc;

use metrics::Counter;
use paygate_api::{MeteringError, MeteringResult};
use tracing::warn;

use crate::MeteringContext;

/// Charges a fixed price for every invocation of wrapped work.
///
/// The price is registered before the work runs and regardless of how the
/// work turns out. Cheap to clone.
#[derive(Clone)]
pub struct PayPerCall {
    price: u64,
    context: Arc<MeteringContext>,
    rejected_total: Counter,
}

impl PayPerCall {
    /// Wrap work priced at `price`, registering with `context`.
    pub fn new(price: u64, context: Arc<MeteringContext>) -> Self {
        Self {
            price,
            context,
            rejected_total: metrics::counter!("metering.calls_rejected_total"),
        }
    }

    /// Price charged per invocation.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Register the price, then run `work` unless metering is blocked.
    ///
    /// The work's own output, including its own errors, is returned inside
    /// `Ok` unchanged.
    ///
    /// # Errors
    ///
    /// - [`MeteringError::NotConfigured`] if no accumulator is installed
    /// - Any error from registering the price, including observer failures
    ///   of a flush triggered by this call
    /// - [`MeteringError::ProcessingErrorState`] if an observer is blocked
    ///   after registration; the work is not run
    pub async fn call<F, Fut>(&self, work: F) -> MeteringResult<Fut::Output>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let accumulator = self.context.accumulator()?;

        accumulator.register_call(self.price).await?;

        if accumulator.is_in_error_state() {
            self.rejected_total.increment(1);
            warn!(price = self.price, "Metering is in error state, method execution blocked");
            return Err(MeteringError::ProcessingErrorState);
        }

        Ok(work().await)
    }
}
