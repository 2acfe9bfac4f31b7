//! The `demo` command: a priced greeting served against an in-memory ledger.

use std::sync::Arc;

use eyre::{Result, WrapErr, eyre};
use paygate_api::MeteringConfig;
use paygate_consumer::LedgerConsumer;
use paygate_core::BatchAccumulator;
use paygate_interceptor::{MeteringContext, PayPerCall};
use paygate_ledger::{FundingMonitor, MemoryLedger};
use tracing::{debug, info, warn};

use crate::cli::DemoArgs;
use crate::config::PaygateConfig;

/// Outcome of a demo run.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DemoReport {
    pub(crate) served: u64,
    pub(crate) rejected: u64,
    pub(crate) client_funding: u64,
    pub(crate) developer_balance: u64,
}

pub(crate) async fn run(args: DemoArgs) -> Result<()> {
    let config = PaygateConfig::load(args.config.as_deref())?.with_overrides(&args);
    config
        .metering
        .validate()
        .map_err(|e| eyre!(e))
        .wrap_err("Invalid metering configuration")?;

    info!(
        mode = %config.metering.mode(),
        calls = config.demo.calls,
        price = config.demo.price,
        funding = config.demo.funding,
        subscription = config.demo.subscription,
        "Starting demo"
    );

    let ledger = Arc::new(FundingMonitor::from_config(
        MemoryLedger::with_funding(config.demo.funding),
        &config.metering,
    ));
    ledger.inner().set_subscription(config.demo.subscription);

    let report = serve(&config, Arc::clone(&ledger)).await?;

    info!(
        served = report.served,
        rejected = report.rejected,
        client_funding = report.client_funding,
        developer_balance = report.developer_balance,
        "Demo finished"
    );

    if args.settle {
        settle(ledger.inner());
    }

    Ok(())
}

/// Run the configured number of greetings, then flush whatever is pending.
pub(crate) async fn serve(
    config: &PaygateConfig,
    ledger: Arc<FundingMonitor<MemoryLedger>>,
) -> Result<DemoReport> {
    let accumulator = Arc::new(BatchAccumulator::from_config(&config.metering));
    let context = Arc::new(MeteringContext::with_accumulator(Arc::clone(&accumulator)));
    context.add_observer(Arc::new(LedgerConsumer::new(Arc::clone(&ledger))))?;

    let greet = PayPerCall::new(config.demo.price, context);
    let mut report = DemoReport::default();

    for call in 0..config.demo.calls {
        let name = format!("caller-{call}");
        match greet.call(|| async move { format!("Hello, {name}!") }).await {
            Ok(greeting) => {
                report.served += 1;
                debug!(call, %greeting, "Served greeting");
            }
            Err(e) => {
                report.rejected += 1;
                warn!(call, error = %e, "Greeting rejected");
            }
        }
    }

    match accumulator.flush().await {
        Ok(Some(event)) => info!(batch_sum = event.batch_sum(), "Flushed pending batch"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Final flush failed"),
    }

    report.client_funding = ledger.inner().client_funding();
    report.developer_balance = ledger.inner().developer_balance();
    Ok(report)
}

fn settle(ledger: &MemoryLedger) {
    let withdrawn = ledger.withdraw_developer_balance();
    info!(amount = withdrawn, "Withdrew developer balance");

    match ledger.request_payout() {
        Ok(amount) => info!(amount, "Paid out remaining client funding"),
        Err(e) => info!(reason = %e, "No client payout"),
    }
}
