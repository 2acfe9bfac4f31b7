//! Observers of flushed batches.

use std::sync::Arc;

use crate::{BatchEvent, MeteringResult};

/// Receives every flushed batch.
///
/// Observers are notified sequentially in registration order. An observer
/// reports whether it is currently unable to accept further work through
/// [`is_in_error_state`](Self::is_in_error_state); the dispatcher polls this
/// on demand rather than being told.
#[async_trait::async_trait]
pub trait MeteringObserver: Send + Sync {
    /// Process a flushed batch.
    async fn handle(&self, event: &BatchEvent) -> MeteringResult<()>;

    /// Whether this observer is blocked.
    ///
    /// Must not wait on an in-flight [`handle`](Self::handle).
    fn is_in_error_state(&self) -> bool;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

#[async_trait::async_trait]
impl<O: MeteringObserver + ?Sized> MeteringObserver for Arc<O> {
    async fn handle(&self, event: &BatchEvent) -> MeteringResult<()> {
        (**self).handle(event).await
    }

    fn is_in_error_state(&self) -> bool {
        (**self).is_in_error_state()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
