//! Ledger collaborator interface.
//!
//! The ledger is the external system of record for client funding. Every
//! method may suspend (remote call) and every method may fail. Consumers
//! decide how to treat read failures; the ledger only reports them.

use std::sync::Arc;

use crate::LedgerError;

/// External ledger holding the client's funding balance.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Charge `amount` against the client's funding.
    async fn consume(&self, amount: u64) -> Result<(), LedgerError>;

    /// Funding currently available to the client.
    async fn available_funds(&self) -> Result<u64, LedgerError>;

    /// Whether the client holds a subscription that waives per-call charges.
    async fn has_valid_subscription(&self) -> Result<bool, LedgerError>;
}

#[async_trait::async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn consume(&self, amount: u64) -> Result<(), LedgerError> {
        (**self).consume(amount).await
    }

    async fn available_funds(&self) -> Result<u64, LedgerError> {
        (**self).available_funds().await
    }

    async fn has_valid_subscription(&self) -> Result<bool, LedgerError> {
        (**self).has_valid_subscription().await
    }
}

#[async_trait::async_trait]
impl<L: Ledger + ?Sized> Ledger for Box<L> {
    async fn consume(&self, amount: u64) -> Result<(), LedgerError> {
        (**self).consume(amount).await
    }

    async fn available_funds(&self) -> Result<u64, LedgerError> {
        (**self).available_funds().await
    }

    async fn has_valid_subscription(&self) -> Result<bool, LedgerError> {
        (**self).has_valid_subscription().await
    }
}
