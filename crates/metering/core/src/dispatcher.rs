//! Ordered delivery of flushed batches to observers.

use std::sync::Arc;

use parking_lot::RwLock;
use paygate_api::{BatchEvent, MeteringObserver, MeteringResult};
use tracing::{debug, warn};

/// Delivers each flushed batch to every registered observer.
///
/// # Delivery
///
/// Observers are called sequentially in registration order. Delivery is
/// fail-fast: the first observer error is returned and later observers do
/// not see that event. The registry is snapshotted before delivery, so an
/// observer registered during a notify only sees later events.
#[derive(Default)]
pub struct Dispatcher {
    observers: RwLock<Vec<Arc<dyn MeteringObserver>>>,
}

impl Dispatcher {
    /// Create a dispatcher with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer to the registry.
    pub fn add_observer(&self, observer: Arc<dyn MeteringObserver>) {
        debug!(observer = observer.name(), "Registering metering observer");
        self.observers.write().push(observer);
    }

    /// Deliver `event` to every observer, stopping at the first failure.
    pub async fn notify(&self, event: &BatchEvent) -> MeteringResult<()> {
        let observers = self.observers.read().clone();

        for observer in observers.iter() {
            if let Err(e) = observer.handle(event).await {
                warn!(
                    observer = observer.name(),
                    batch_sum = event.batch_sum(),
                    error = %e,
                    "Observer failed to handle batch"
                );
                return Err(e);
            }
        }

        Ok(())
    }

    /// Whether any observer currently reports an error state.
    pub fn is_in_error_state(&self) -> bool {
        self.observers
            .read()
            .iter()
            .any(|observer| observer.is_in_error_state())
    }

    /// Names of registered observers, in registration order.
    pub fn observer_names(&self) -> Vec<&'static str> {
        self.observers.read().iter().map(|o| o.name()).collect()
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use parking_lot::Mutex;
    use paygate_api::MeteringError;
    use paygate_test_utils::{FailingObserver, RecordingObserver};

    /// Appends its tag to a shared log on every event.
    struct TaggingObserver {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl MeteringObserver for TaggingObserver {
        async fn handle(&self, _event: &BatchEvent) -> MeteringResult<()> {
            self.log.lock().push(self.tag);
            Ok(())
        }

        fn is_in_error_state(&self) -> bool {
            false
        }

        fn name(&self) -> &'static str {
            self.tag
        }
    }

    #[tokio::test]
    async fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new();
        for tag in ["first", "second", "third"] {
            dispatcher.add_observer(Arc::new(TaggingObserver {
                tag,
                log: Arc::clone(&log),
            }));
        }

        dispatcher.notify(&BatchEvent::new(10)).await.expect("notify");
        dispatcher.notify(&BatchEvent::new(20)).await.expect("notify");

        assert_eq!(
            *log.lock(),
            vec!["first", "second", "third", "first", "second", "third"]
        );
        assert_eq!(dispatcher.observer_names(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_notify_stops_at_first_failure() {
        let before = Arc::new(RecordingObserver::new());
        let after = Arc::new(RecordingObserver::new());

        let dispatcher = Dispatcher::new();
        dispatcher.add_observer(before.clone());
        dispatcher.add_observer(Arc::new(FailingObserver));
        dispatcher.add_observer(after.clone());

        let result = dispatcher.notify(&BatchEvent::new(50)).await;

        assert_matches!(result, Err(MeteringError::ConsumptionFailed { amount: 50, .. }));
        assert_eq!(before.count(), 1);
        assert_eq!(after.count(), 0);
    }

    #[tokio::test]
    async fn test_notify_without_observers() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.is_empty());
        assert!(dispatcher.notify(&BatchEvent::new(1)).await.is_ok());
        assert!(!dispatcher.is_in_error_state());
    }

    #[test]
    fn test_error_state_aggregates_observers() {
        let dispatcher = Dispatcher::new();
        dispatcher.add_observer(Arc::new(RecordingObserver::new()));
        assert!(!dispatcher.is_in_error_state());

        dispatcher.add_observer(Arc::new(FailingObserver));
        assert!(dispatcher.is_in_error_state());
        assert_eq!(dispatcher.len(), 2);
    }
}
