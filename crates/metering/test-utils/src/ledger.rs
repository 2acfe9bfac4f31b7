//! Scriptable ledger mock.

use parking_lot::Mutex;
use paygate_api::{Ledger, LedgerError};

/// Ledger whose responses are set by the test and whose calls are counted.
///
/// Defaults: `consume` succeeds, funding is zero, no subscription.
#[derive(Debug)]
pub struct MockLedger {
    state: Mutex<MockState>,
}

#[derive(Debug)]
struct MockState {
    consume: Result<(), LedgerError>,
    funds: Result<u64, LedgerError>,
    subscription: Result<bool, LedgerError>,
    consumed: Vec<u64>,
    consume_calls: usize,
    funds_queries: usize,
    subscription_checks: usize,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    /// Create a mock with default responses.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                consume: Ok(()),
                funds: Ok(0),
                subscription: Ok(false),
                consumed: Vec::new(),
                consume_calls: 0,
                funds_queries: 0,
                subscription_checks: 0,
            }),
        }
    }

    /// Make every subsequent `consume` fail with `error`.
    pub fn fail_consume(&self, error: LedgerError) {
        self.state.lock().consume = Err(error);
    }

    /// Make every subsequent `consume` succeed.
    pub fn succeed_consume(&self) {
        self.state.lock().consume = Ok(());
    }

    /// Set the funding reported by `available_funds`.
    pub fn set_funds(&self, funds: u64) {
        self.state.lock().funds = Ok(funds);
    }

    /// Make `available_funds` fail with `error`.
    pub fn fail_funds(&self, error: LedgerError) {
        self.state.lock().funds = Err(error);
    }

    /// Set the answer of `has_valid_subscription`.
    pub fn set_subscription(&self, valid: bool) {
        self.state.lock().subscription = Ok(valid);
    }

    /// Make `has_valid_subscription` fail with `error`.
    pub fn fail_subscription(&self, error: LedgerError) {
        self.state.lock().subscription = Err(error);
    }

    /// Number of `consume` calls, failed ones included.
    pub fn consume_calls(&self) -> usize {
        self.state.lock().consume_calls
    }

    /// Amounts passed to successful `consume` calls, in call order.
    pub fn consumed(&self) -> Vec<u64> {
        self.state.lock().consumed.clone()
    }

    /// Number of `available_funds` calls.
    pub fn funds_queries(&self) -> usize {
        self.state.lock().funds_queries
    }

    /// Number of `has_valid_subscription` calls.
    pub fn subscription_checks(&self) -> usize {
        self.state.lock().subscription_checks
    }
}

#[async_trait::async_trait]
impl Ledger for MockLedger {
    async fn consume(&self, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        state.consume_calls += 1;
        let result = state.consume.clone();
        if result.is_ok() {
            state.consumed.push(amount);
        }
        result
    }

    async fn available_funds(&self) -> Result<u64, LedgerError> {
        let mut state = self.state.lock();
        state.funds_queries += 1;
        state.funds.clone()
    }

    async fn has_valid_subscription(&self) -> Result<bool, LedgerError> {
        let mut state = self.state.lock();
        state.subscription_checks += 1;
        state.subscription.clone()
    }
}
