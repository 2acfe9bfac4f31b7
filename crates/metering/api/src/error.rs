//! Error types for metering operations.
//!
//! [`LedgerError`] is what a [`Ledger`](crate::Ledger) reports. [`MeteringError`]
//! is what crosses the call interceptor boundary back to the original caller.

/// Failure reported by a ledger collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger refused the operation.
    #[error("ledger rejected the operation: {reason}")]
    Rejected {
        /// Description of the rejection.
        reason: String,
    },

    /// The client's funding does not cover the requested amount.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount that was requested.
        required: u64,
        /// Funding available at the time of the request.
        available: u64,
    },

    /// The ledger could not be reached.
    #[error("ledger unavailable: {reason}")]
    Unavailable {
        /// Description of the transport or node failure.
        reason: String,
    },
}

impl LedgerError {
    /// Shorthand for [`LedgerError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`LedgerError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced to callers of metered work.
#[derive(Debug, thiserror::Error)]
pub enum MeteringError {
    /// No accumulator has been installed.
    #[error("metering is not configured: no batch accumulator installed")]
    NotConfigured,

    /// At least one observer is blocked; metered work is refused.
    #[error("metering is in error state, method execution blocked")]
    ProcessingErrorState,

    /// The consumer is blocked and the ledger funding does not cover the
    /// pending batch. The client must refund the ledger to continue.
    #[error(
        "consumer is blocked: required {required}, available {}; refund the ledger to continue",
        .available.map_or_else(|| "unknown".into(), |a| a.to_string())
    )]
    IllegalState {
        /// Amount of the batch that could not be settled.
        required: u64,
        /// Funding reported by the ledger, `None` if the query failed.
        available: Option<u64>,
    },

    /// The ledger rejected a consumption.
    #[error("failed to consume {amount} from ledger")]
    ConsumptionFailed {
        /// Amount that was being consumed.
        amount: u64,
        /// Underlying ledger failure.
        #[source]
        source: LedgerError,
    },

    /// Adding the price would overflow the running batch sum.
    #[error("price {price} overflows pending batch sum {pending}")]
    PriceOverflow {
        /// Sum pending in the batch.
        pending: u64,
        /// Price that was being added.
        price: u64,
    },
}

/// Result type for metering operations.
pub type MeteringResult<T> = core::result::Result<T, MeteringError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_illegal_state_message() {
        let err = MeteringError::IllegalState {
            required: 100,
            available: Some(50),
        };
        assert_eq!(
            err.to_string(),
            "consumer is blocked: required 100, available 50; refund the ledger to continue"
        );

        let err = MeteringError::IllegalState {
            required: 100,
            available: None,
        };
        assert!(err.to_string().contains("available unknown"));
    }

    #[test]
    fn test_consumption_failed_keeps_source() {
        let err = MeteringError::ConsumptionFailed {
            amount: 7,
            source: LedgerError::rejected("reverted"),
        };
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("ledger rejected the operation: reverted")
        );
    }
}
