//! Observer mocks.

use parking_lot::Mutex;
use paygate_api::{BatchEvent, LedgerError, MeteringError, MeteringObserver, MeteringResult};

/// Records every event it receives. Never fails.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BatchEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in delivery order.
    pub fn events(&self) -> Vec<BatchEvent> {
        self.events.lock().clone()
    }

    /// Number of events received.
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Sum of all received batch sums.
    pub fn total(&self) -> u64 {
        self.events.lock().iter().map(BatchEvent::batch_sum).sum()
    }
}

#[async_trait::async_trait]
impl MeteringObserver for RecordingObserver {
    async fn handle(&self, event: &BatchEvent) -> MeteringResult<()> {
        self.events.lock().push(*event);
        Ok(())
    }

    fn is_in_error_state(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every event with [`MeteringError::ConsumptionFailed`] and always
/// reports an error state.
#[derive(Debug, Default)]
pub struct FailingObserver;

#[async_trait::async_trait]
impl MeteringObserver for FailingObserver {
    async fn handle(&self, event: &BatchEvent) -> MeteringResult<()> {
        Err(MeteringError::ConsumptionFailed {
            amount: event.batch_sum(),
            source: LedgerError::rejected("observer failed"),
        })
    }

    fn is_in_error_state(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
