//! Events produced by the batch accumulator.

/// A flushed batch, ready to be settled.
///
/// Created exactly once per flush and delivered by reference to every
/// registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchEvent {
    batch_sum: u64,
}

impl BatchEvent {
    /// Create an event for a flushed batch sum.
    pub const fn new(batch_sum: u64) -> Self {
        Self { batch_sum }
    }

    /// Sum of all call prices in the batch.
    pub const fn batch_sum(&self) -> u64 {
        self.batch_sum
    }
}
