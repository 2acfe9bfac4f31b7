//! Paygate API - interfaces for pay-per-call metering.
//!
//! This crate defines the seams between the metering engine and the outside
//! world. Implementations live elsewhere: the batching engine in
//! `paygate-core`, the ledger consumer in `paygate-consumer`, concrete
//! ledgers in `paygate-ledger`.
//!
//! # Core Concepts
//!
//! - [`Ledger`] - External system of record for client funding and consumption
//! - [`MeteringObserver`] - Receives every [`BatchEvent`] produced by a flush
//! - [`MeteringConfig`] - Batching configuration
//!
//! # Units
//!
//! Prices and balances are plain `u64` units. The ledger decides what a unit
//! is worth; the metering engine only sums them.

#![warn(missing_docs)]

mod config;
mod error;
mod event;
mod ledger;
mod mode;
mod observer;

pub use config::*;
pub use error::*;
pub use event::*;
pub use ledger::*;
pub use mode::*;
pub use observer::*;
