/// Batching mode.
///
/// Determines how often accumulated call prices are flushed to observers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    strum::Display,
    strum::FromRepr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum BatchMode {
    /// Every call flushes its own price.
    ///
    /// One ledger transaction per call. Simple and exact, but expensive.
    #[default]
    Immediate = 0,

    /// Each call flushes the pending batch with a fixed probability.
    ///
    /// Amortises ledger transactions over roughly `1 / probability` calls.
    Sampled = 1,
}

impl BatchMode {
    /// Whether this mode uses a random draw per call.
    pub fn is_sampled(&self) -> bool {
        matches!(self, BatchMode::Sampled)
    }
}
