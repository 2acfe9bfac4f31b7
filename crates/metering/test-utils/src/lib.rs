//! Test utilities and mocks for paygate crates.
//!
//! - [`MockLedger`] - Scriptable ledger that records every call
//! - [`RecordingObserver`] - Observer that records every flushed batch
//! - [`FailingObserver`] - Observer that always fails and reports an error state

mod ledger;
mod observer;

pub use ledger::MockLedger;
pub use observer::{FailingObserver, RecordingObserver};
