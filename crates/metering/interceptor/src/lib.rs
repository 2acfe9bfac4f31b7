//! Pay-per-call interception of metered work.
//!
//! A [`PayPerCall`] wraps a unit of work with a fixed price. Each invocation
//! registers the price with the accumulator installed in a shared
//! [`MeteringContext`], refuses to run if metering is in an error state, and
//! otherwise runs the work and hands back its output untouched.
//!
//! ```ignore
//! let context = Arc::new(MeteringContext::new());
//! context.install(Arc::new(BatchAccumulator::from_config(&args)));
//! context.add_observer(Arc::new(LedgerConsumer::new(ledger)))?;
//!
//! let greet = PayPerCall::new(1, Arc::clone(&context));
//! let greeting = greet.call(|| async { "Hello" }).await?;
//! ```

mod context;
mod interceptor;

pub use context::MeteringContext;
pub use interceptor::PayPerCall;
