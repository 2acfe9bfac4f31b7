//! Running-sum batch register.
//!
//! The sum, the flush decision and the read-and-reset share one critical
//! section. Dispatch runs after the lock is released, so observers may
//! suspend on the ledger without blocking other callers.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use paygate_api::{BatchEvent, MeteringConfig, MeteringError, MeteringObserver, MeteringResult};
use tracing::{debug, trace};

use crate::dispatcher::Dispatcher;
use crate::metrics::BatchMetrics;
use crate::policy::{self, FlushPolicy};

/// Accumulates call prices and flushes them as [`BatchEvent`]s.
///
/// Every added price ends up in exactly one flushed event: the add, the
/// policy decision and the reset happen under the same lock.
pub struct BatchAccumulator {
    batch: Mutex<Batch>,
    dispatcher: Dispatcher,
    metrics: BatchMetrics,
}

impl fmt::Debug for BatchAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchAccumulator")
            .field("pending", &self.pending())
            .field("observers", &self.dispatcher.observer_names())
            .finish_non_exhaustive()
    }
}

struct Batch {
    sum: u64,
    policy: Box<dyn FlushPolicy>,
}

impl Batch {
    fn add(&mut self, price: u64) -> MeteringResult<()> {
        self.sum = self
            .sum
            .checked_add(price)
            .ok_or(MeteringError::PriceOverflow {
                pending: self.sum,
                price,
            })?;
        Ok(())
    }

    fn take(&mut self) -> u64 {
        std::mem::take(&mut self.sum)
    }
}

impl BatchAccumulator {
    /// Create an accumulator flushing according to `policy`.
    pub fn new(policy: impl FlushPolicy + 'static) -> Self {
        Self::with_boxed_policy(Box::new(policy))
    }

    /// Create an accumulator with the policy selected by `config`.
    pub fn from_config(config: &impl MeteringConfig) -> Self {
        Self::with_boxed_policy(policy::from_config(config))
    }

    fn with_boxed_policy(policy: Box<dyn FlushPolicy>) -> Self {
        Self {
            batch: Mutex::new(Batch { sum: 0, policy }),
            dispatcher: Dispatcher::new(),
            metrics: BatchMetrics::default(),
        }
    }

    /// The dispatcher flushed batches are delivered through.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Register an observer for flushed batches.
    pub fn add_observer(&self, observer: Arc<dyn MeteringObserver>) {
        self.dispatcher.add_observer(observer);
    }

    /// Add `price` to the pending batch without consulting the policy.
    ///
    /// Fails with [`MeteringError::PriceOverflow`] if the sum would overflow;
    /// the pending sum is left unchanged in that case.
    pub fn add(&self, price: u64) -> MeteringResult<()> {
        let mut batch = self.batch.lock();
        batch.add(price)?;
        self.metrics.record_call(batch.sum);
        Ok(())
    }

    /// Amount pending in the current batch.
    pub fn pending(&self) -> u64 {
        self.batch.lock().sum
    }

    /// Register one call: add its price, then flush if the policy says so.
    ///
    /// A flush delivers the batch to every observer before returning; an
    /// observer failure is returned to the caller.
    pub async fn register_call(&self, price: u64) -> MeteringResult<()> {
        match self.add_and_maybe_take(price)? {
            Some(event) => self.dispatch(event).await,
            None => Ok(()),
        }
    }

    /// Flush whatever is pending regardless of the policy.
    ///
    /// Returns the delivered event, or `None` if nothing was pending.
    pub async fn flush(&self) -> MeteringResult<Option<BatchEvent>> {
        let batch_sum = self.batch.lock().take();
        if batch_sum == 0 {
            return Ok(None);
        }

        let event = BatchEvent::new(batch_sum);
        self.dispatch(event).await?;
        Ok(Some(event))
    }

    /// Whether any observer is in an error state.
    pub fn is_in_error_state(&self) -> bool {
        self.dispatcher.is_in_error_state()
    }

    fn add_and_maybe_take(&self, price: u64) -> MeteringResult<Option<BatchEvent>> {
        let mut batch = self.batch.lock();
        batch.add(price)?;
        self.metrics.record_call(batch.sum);
        trace!(price, pending = batch.sum, "Registered call");

        if !batch.policy.should_flush() {
            return Ok(None);
        }

        Ok(Some(BatchEvent::new(batch.take())))
    }

    async fn dispatch(&self, event: BatchEvent) -> MeteringResult<()> {
        debug!(batch_sum = event.batch_sum(), "Flushing batch");
        self.metrics.record_flush(event.batch_sum());
        self.dispatcher.notify(&event).await
    }
}
