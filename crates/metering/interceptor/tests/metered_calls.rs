use std::sync::Arc;

use assert_matches::assert_matches;
use paygate_api::{LedgerError, MeteringError};
use paygate_consumer::LedgerConsumer;
use paygate_core::{BatchAccumulator, Immediate, Sampled};
use paygate_interceptor::{MeteringContext, PayPerCall};
use paygate_ledger::{FundingMonitor, MemoryLedger};
use paygate_test_utils::MockLedger;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn wire<L: paygate_api::Ledger + 'static>(
    accumulator: BatchAccumulator,
    ledger: L,
) -> (Arc<MeteringContext>, Arc<LedgerConsumer<L>>) {
    let context = Arc::new(MeteringContext::with_accumulator(Arc::new(accumulator)));
    let consumer = Arc::new(LedgerConsumer::new(ledger));
    context
        .add_observer(consumer.clone())
        .expect("accumulator installed");
    (context, consumer)
}

async fn greet(call: &PayPerCall, name: &str) -> Result<String, MeteringError> {
    call.call(|| async move { format!("Hello, {name}!") }).await
}

#[tokio::test]
async fn funding_is_consumed_per_call() {
    init_tracing();

    let ledger = Arc::new(MemoryLedger::with_funding(50));
    let (context, _) = wire(BatchAccumulator::new(Immediate), Arc::clone(&ledger));
    let call = PayPerCall::new(1, context);

    let greeting = greet(&call, "paygate").await.expect("metered call");

    assert_eq!(greeting, "Hello, paygate!");
    assert_eq!(ledger.client_funding(), 49);
    assert_eq!(ledger.developer_balance(), 1);
    assert_eq!(ledger.withdraw_developer_balance(), 1);
    assert_eq!(ledger.developer_balance(), 0);
}

#[tokio::test]
async fn subscription_waives_charges() {
    init_tracing();

    let ledger = Arc::new(MemoryLedger::with_funding(10));
    ledger.set_subscription(true);
    let (context, _) = wire(BatchAccumulator::new(Immediate), Arc::clone(&ledger));
    let call = PayPerCall::new(1, context);

    for _ in 0..5 {
        greet(&call, "subscriber").await.expect("metered call");
    }

    assert_eq!(ledger.client_funding(), 10);
    assert_eq!(ledger.developer_balance(), 0);
}

#[tokio::test]
async fn blocked_consumer_recovers_after_refund() {
    init_tracing();

    let ledger = Arc::new(MockLedger::new());
    ledger.fail_consume(LedgerError::rejected("insufficient funds"));
    let (context, consumer) = wire(BatchAccumulator::new(Immediate), Arc::clone(&ledger));
    let call = PayPerCall::new(100, context);

    // First charge fails and blocks the consumer.
    let result = greet(&call, "a").await;
    assert_matches!(result, Err(MeteringError::ConsumptionFailed { amount: 100, .. }));
    assert!(consumer.is_blocked());

    // Funding still short: caller is told to refund.
    ledger.set_funds(50);
    let result = greet(&call, "b").await;
    assert_matches!(
        result,
        Err(MeteringError::IllegalState {
            required: 100,
            available: Some(50)
        })
    );
    assert_eq!(ledger.consume_calls(), 1);
    assert!(consumer.is_blocked());

    // Refunded: the next call settles its batch and runs.
    ledger.set_funds(100);
    ledger.succeed_consume();
    let greeting = greet(&call, "c").await.expect("recovered call");

    assert_eq!(greeting, "Hello, c!");
    assert!(!consumer.is_blocked());
    assert_eq!(ledger.consume_calls(), 2);
    assert_eq!(ledger.consumed(), vec![100]);
}

#[tokio::test]
async fn blocked_consumer_rejects_work_between_flushes() {
    init_tracing();

    let ledger = Arc::new(MemoryLedger::with_funding(5));
    let (context, consumer) = wire(BatchAccumulator::new(Immediate), Arc::clone(&ledger));
    let call = PayPerCall::new(10, Arc::clone(&context));

    assert_matches!(
        greet(&call, "a").await,
        Err(MeteringError::ConsumptionFailed { amount: 10, .. })
    );

    // Swap in a batching accumulator that never flushes on its own: the call
    // is registered but the blocked consumer still refuses the work.
    context.install(Arc::new(BatchAccumulator::new(Sampled::seeded(0.0, 0))));
    context
        .add_observer(consumer.clone())
        .expect("accumulator installed");

    assert_matches!(
        greet(&call, "b").await,
        Err(MeteringError::ProcessingErrorState)
    );
    assert_eq!(context.accumulator().expect("installed").pending(), 10);
    assert_eq!(ledger.client_funding(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sampled_batches_settle_every_call() {
    init_tracing();

    const TASKS: u64 = 4;
    const CALLS: u64 = 250;

    let ledger = Arc::new(FundingMonitor::new(MemoryLedger::with_funding(10_000), 100));
    let accumulator = Arc::new(BatchAccumulator::new(Sampled::seeded(0.1, 7)));
    let context = Arc::new(MeteringContext::with_accumulator(Arc::clone(&accumulator)));
    context
        .add_observer(Arc::new(LedgerConsumer::new(Arc::clone(&ledger))))
        .expect("accumulator installed");

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let call = PayPerCall::new(2, Arc::clone(&context));
            tokio::spawn(async move {
                for _ in 0..CALLS {
                    call.call(|| async {}).await.expect("metered call");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task");
    }

    accumulator.flush().await.expect("final flush");

    let charged = TASKS * CALLS * 2;
    assert_eq!(ledger.inner().developer_balance(), charged);
    assert_eq!(ledger.inner().client_funding(), 10_000 - charged);
}
