//! Ledger consumer metrics.

use metrics::Counter;

/// Counters for ledger consumption and blocked-state transitions.
#[derive(Clone, Debug)]
pub(crate) struct ConsumerMetrics {
    /// Units charged to the ledger
    pub(crate) consumed_units_total: Counter,
    /// Transitions into the blocked state
    pub(crate) blocked_total: Counter,
    /// Transitions out of the blocked state
    pub(crate) unblocked_total: Counter,
    /// Batches waived by a valid subscription
    pub(crate) subscription_bypass_total: Counter,
}

impl Default for ConsumerMetrics {
    fn default() -> Self {
        Self {
            consumed_units_total: metrics::counter!("metering.consumer.consumed_units_total"),
            blocked_total: metrics::counter!("metering.consumer.blocked_total"),
            unblocked_total: metrics::counter!("metering.consumer.unblocked_total"),
            subscription_bypass_total: metrics::counter!(
                "metering.consumer.subscription_bypass_total"
            ),
        }
    }
}
