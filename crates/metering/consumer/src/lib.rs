//! Ledger consumer - settles flushed batches against an external ledger.
//!
//! [`LedgerConsumer`] is the [`MeteringObserver`] that turns each
//! [`BatchEvent`] into a ledger charge. A failed charge blocks the consumer;
//! later events try to recover by checking the client's funding.
//!
//! # State Machine
//!
//! ```text
//!              consume fails
//!   Unblocked ───────────────▶ Blocked ◀──┐ funds < batch (IllegalState)
//!       ▲                         │  └────┘ or retry consume fails
//!       └─────────────────────────┘
//!        funds >= batch and retry consume succeeds
//! ```
//!
//! While unblocked, a valid subscription waives the charge entirely. Ledger
//! read failures never escape: a failed subscription check counts as "no
//! subscription", a failed funds query counts as "still blocked".

mod consumer;
mod metrics;

pub use consumer::{ConsumerState, LedgerConsumer};

#[doc(no_inline)]
pub use paygate_api::{BatchEvent, MeteringObserver};
