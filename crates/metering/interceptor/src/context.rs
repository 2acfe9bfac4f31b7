//! Swappable accumulator slot shared by every interceptor.

use std::sync::Arc;

use parking_lot::RwLock;
use paygate_api::{MeteringError, MeteringObserver, MeteringResult};
use paygate_core::BatchAccumulator;
use tracing::{debug, info};

/// Holds the accumulator that intercepted calls register with.
///
/// Installed once at startup and read by every call. Installing again
/// replaces the accumulator for all subsequent calls; observers registered
/// on the previous one do not carry over.
#[derive(Default)]
pub struct MeteringContext {
    accumulator: RwLock<Option<Arc<BatchAccumulator>>>,
}

impl MeteringContext {
    /// Create a context with no accumulator installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with `accumulator` installed.
    pub fn with_accumulator(accumulator: Arc<BatchAccumulator>) -> Self {
        Self {
            accumulator: RwLock::new(Some(accumulator)),
        }
    }

    /// Install `accumulator`, returning the one it replaces.
    pub fn install(&self, accumulator: Arc<BatchAccumulator>) -> Option<Arc<BatchAccumulator>> {
        let previous = self.accumulator.write().replace(accumulator);
        if previous.is_some() {
            info!("Replaced installed batch accumulator");
        } else {
            debug!("Installed batch accumulator");
        }
        previous
    }

    /// The installed accumulator.
    pub fn accumulator(&self) -> MeteringResult<Arc<BatchAccumulator>> {
        self.accumulator
            .read()
            .clone()
            .ok_or(MeteringError::NotConfigured)
    }

    /// Whether an accumulator is installed.
    pub fn is_configured(&self) -> bool {
        self.accumulator.read().is_some()
    }

    /// Register `observer` with the installed accumulator.
    pub fn add_observer(&self, observer: Arc<dyn MeteringObserver>) -> MeteringResult<()> {
        self.accumulator()?.add_observer(observer);
        Ok(())
    }
}
