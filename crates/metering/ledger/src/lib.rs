//! Ledger implementations for pay-per-call metering.
//!
//! - [`MemoryLedger`] - Process-local ledger for demos and tests
//! - [`FundingMonitor`] - Wraps any ledger and warns when funding runs low
//!
//! On-chain ledgers implement [`Ledger`](paygate_api::Ledger) outside this
//! workspace; they can be wrapped in a [`FundingMonitor`] the same way.

mod memory;
mod monitor;

pub use memory::MemoryLedger;
pub use monitor::FundingMonitor;
