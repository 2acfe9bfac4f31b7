//! Blocked/unblocked consumption of flushed batches.

use std::sync::atomic::{AtomicBool, Ordering};

use paygate_api::{BatchEvent, Ledger, MeteringError, MeteringObserver, MeteringResult};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::metrics::ConsumerMetrics;

/// Consumer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsumerState {
    /// Batches are charged normally.
    #[default]
    Unblocked,
    /// A charge failed; every batch attempts recovery first.
    Blocked,
}

/// Charges flushed batches against a [`Ledger`].
///
/// `handle` calls on one consumer are serialized, so the blocked flag is
/// only ever changed by one batch at a time. The flag itself is atomic and
/// can be read while a batch is in flight.
pub struct LedgerConsumer<L> {
    ledger: L,
    blocked: AtomicBool,
    serial: Mutex<()>,
    metrics: ConsumerMetrics,
}

impl<L: Ledger> LedgerConsumer<L> {
    /// Create an unblocked consumer charging `ledger`.
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            blocked: AtomicBool::new(false),
            serial: Mutex::new(()),
            metrics: ConsumerMetrics::default(),
        }
    }

    /// The ledger this consumer charges.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Current state.
    pub fn state(&self) -> ConsumerState {
        if self.is_blocked() {
            ConsumerState::Blocked
        } else {
            ConsumerState::Unblocked
        }
    }

    /// Whether a previous charge failed and has not been recovered.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Settle one flushed batch.
    ///
    /// # Errors
    ///
    /// - [`MeteringError::ConsumptionFailed`] if the ledger rejects the charge
    ///   (the consumer is blocked afterwards)
    /// - [`MeteringError::IllegalState`] if the consumer is blocked and the
    ///   client's funding does not cover the batch
    pub async fn handle_batch(&self, event: &BatchEvent) -> MeteringResult<()> {
        let _serial = self.serial.lock().await;
        let amount = event.batch_sum();

        if self.is_blocked() {
            self.recover(amount).await
        } else {
            self.settle(amount).await
        }
    }

    /// Normal path: subscription check, then charge.
    async fn settle(&self, amount: u64) -> MeteringResult<()> {
        if self.subscription_waives_charges().await {
            debug!(%amount, "Valid subscription, skipping consumption");
            self.metrics.subscription_bypass_total.increment(1);
            return Ok(());
        }

        self.consume(amount).await
    }

    /// Blocked path: check funding, retry the charge if it covers the batch,
    /// and unblock once the retry succeeds.
    async fn recover(&self, amount: u64) -> MeteringResult<()> {
        debug!(%amount, "Attempting to unblock ledger consumer");

        let available = match self.ledger.available_funds().await {
            Ok(funds) => Some(funds),
            Err(e) => {
                warn!(error = %e, "Failed to query funding while attempting to unblock");
                None
            }
        };

        match available {
            Some(funds) if funds >= amount => {
                debug!(%funds, required = %amount, "Funding covers the batch, retrying consumption");
            }
            _ => {
                warn!(
                    available = ?available,
                    required = %amount,
                    "Not enough funding available, remaining blocked"
                );
                return Err(MeteringError::IllegalState {
                    required: amount,
                    available,
                });
            }
        }

        // Stays blocked until the retry has actually gone through.
        self.consume(amount).await?;
        self.set_blocked(false);
        info!(required = %amount, "Ledger consumer unblocked with sufficient funds");
        Ok(())
    }

    async fn subscription_waives_charges(&self) -> bool {
        match self.ledger.has_valid_subscription().await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "Subscription check failed, charging normally");
                false
            }
        }
    }

    /// Charge the ledger, blocking on failure.
    async fn consume(&self, amount: u64) -> MeteringResult<()> {
        match self.ledger.consume(amount).await {
            Ok(()) => {
                self.metrics.consumed_units_total.increment(amount);
                debug!(%amount, "Consumed from ledger");
                Ok(())
            }
            Err(source) => {
                self.set_blocked(true);
                error!(
                    %amount,
                    error = %source,
                    "Failed to consume from ledger, switching to blocked state; refund the ledger to continue"
                );
                Err(MeteringError::ConsumptionFailed { amount, source })
            }
        }
    }

    fn set_blocked(&self, blocked: bool) {
        let was_blocked = self.blocked.swap(blocked, Ordering::AcqRel);
        match (was_blocked, blocked) {
            (false, true) => self.metrics.blocked_total.increment(1),
            (true, false) => self.metrics.unblocked_total.increment(1),
            _ => {}
        }
    }
}

#[async_trait::async_trait]
impl<L: Ledger> MeteringObserver for LedgerConsumer<L> {
    async fn handle(&self, event: &BatchEvent) -> MeteringResult<()> {
        self.handle_batch(event).await
    }

    fn is_in_error_state(&self) -> bool {
        self.is_blocked()
    }

    fn name(&self) -> &'static str {
        "ledger-consumer"
    }
}
