//! Low-funds warning wrapper.

use paygate_api::{Ledger, LedgerError, MeteringConfig};
use tracing::{debug, warn};

/// Forwards every call to `inner` and, after each successful consumption,
/// warns when the remaining funding is below a threshold.
///
/// A threshold of zero disables the check.
#[derive(Debug)]
pub struct FundingMonitor<L> {
    inner: L,
    low_funds_threshold: u64,
}

impl<L: Ledger> FundingMonitor<L> {
    /// Wrap `inner` with an explicit threshold.
    pub fn new(inner: L, low_funds_threshold: u64) -> Self {
        Self {
            inner,
            low_funds_threshold,
        }
    }

    /// Wrap `inner` with the threshold from `config`.
    pub fn from_config(inner: L, config: &impl MeteringConfig) -> Self {
        Self::new(inner, config.low_funds_threshold())
    }

    /// The wrapped ledger.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Warning threshold.
    pub fn low_funds_threshold(&self) -> u64 {
        self.low_funds_threshold
    }

    async fn warn_if_low(&self) {
        if self.low_funds_threshold == 0 {
            return;
        }

        match self.inner.available_funds().await {
            Ok(funds) if funds < self.low_funds_threshold => {
                warn!(
                    %funds,
                    threshold = self.low_funds_threshold,
                    "Client funding is low, consider refunding to avoid interruptions"
                );
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Failed to read funding after consumption"),
        }
    }
}

#[async_trait::async_trait]
impl<L: Ledger> Ledger for FundingMonitor<L> {
    async fn consume(&self, amount: u64) -> Result<(), LedgerError> {
        self.inner.consume(amount).await?;
        self.warn_if_low().await;
        Ok(())
    }

    async fn available_funds(&self) -> Result<u64, LedgerError> {
        self.inner.available_funds().await
    }

    async fn has_valid_subscription(&self) -> Result<bool, LedgerError> {
        self.inner.has_valid_subscription().await
    }
}
