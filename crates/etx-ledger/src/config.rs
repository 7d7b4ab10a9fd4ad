use serde::{Deserialize, Serialize};

/// Tunables for a [`Ledger`](crate::Ledger).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Bucket count of the uniqueness index. Fixed for the ledger's lifetime.
    pub index_buckets: usize,
    /// Pair transaction count at which a buyer becomes a seller's regular.
    pub regular_buyer_threshold: u32,
    /// Energy amount splitting a seller's two price tiers. Trades at or
    /// below the boundary set the low tier.
    pub price_tier_boundary: f64,
    /// When `true`, inserts fold into the derived collections immediately
    /// as long as those collections are in sync.
    pub incremental_aggregation: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            index_buckets: etx_index::DEFAULT_BUCKETS,
            regular_buyer_threshold: 5,
            price_tier_boundary: 300.0,
            incremental_aggregation: false,
        }
    }
}

impl LedgerConfig {
    /// Defaults with incremental aggregation switched on.
    pub fn incremental() -> Self {
        Self {
            incremental_aggregation: true,
            ..Default::default()
        }
    }
}
