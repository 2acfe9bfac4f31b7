//! Process-local ledger.
//!
//! Tracks one client's funding and the developer balance that consumption
//! pays into. Operations are serialized under a lock, one transaction at a
//! time.

use parking_lot::Mutex;
use paygate_api::{Ledger, LedgerError};
use tracing::debug;

/// In-memory ledger for a single client.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    client_funding: u64,
    developer_balance: u64,
    subscription: bool,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with initial client funding.
    pub fn with_funding(amount: u64) -> Self {
        let ledger = Self::new();
        ledger.state.lock().client_funding = amount;
        ledger
    }

    /// Add client funding. Returns the new funding.
    pub fn fund(&self, amount: u64) -> u64 {
        let mut state = self.state.lock();
        state.client_funding = state.client_funding.saturating_add(amount);
        debug!(%amount, funding = state.client_funding, "Client funded");
        state.client_funding
    }

    /// Grant or revoke the client's subscription.
    pub fn set_subscription(&self, valid: bool) {
        self.state.lock().subscription = valid;
    }

    /// Client funding not yet consumed.
    pub fn client_funding(&self) -> u64 {
        self.state.lock().client_funding
    }

    /// Amount consumed and not yet withdrawn by the developer.
    pub fn developer_balance(&self) -> u64 {
        self.state.lock().developer_balance
    }

    /// Withdraw the developer balance. Returns the withdrawn amount.
    pub fn withdraw_developer_balance(&self) -> u64 {
        let amount = std::mem::take(&mut self.state.lock().developer_balance);
        debug!(%amount, "Developer balance withdrawn");
        amount
    }

    /// Pay out the client's unconsumed funding.
    ///
    /// Fails if there is nothing to pay out.
    pub fn request_payout(&self) -> Result<u64, LedgerError> {
        let mut state = self.state.lock();
        if state.client_funding == 0 {
            return Err(LedgerError::rejected("no funds to pay out"));
        }

        let amount = std::mem::take(&mut state.client_funding);
        debug!(%amount, "Client payout");
        Ok(amount)
    }
}

#[async_trait::async_trait]
impl Ledger for MemoryLedger {
    async fn consume(&self, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        if amount > state.client_funding {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: state.client_funding,
            });
        }

        state.client_funding -= amount;
        state.developer_balance = state.developer_balance.saturating_add(amount);
        Ok(())
    }

    async fn available_funds(&self) -> Result<u64, LedgerError> {
        Ok(self.client_funding())
    }

    async fn has_valid_subscription(&self) -> Result<bool, LedgerError> {
        Ok(self.state.lock().subscription)
    }
}
