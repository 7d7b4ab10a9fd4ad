use serde::Serialize;

use etx_types::{Identifier, PairKey, Timestamp, TransactionDraft};

/// A validated energy trade held by the ledger.
///
/// `value` and `pair` are derived at construction and kept in step by
/// every amendment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: Identifier,
    pub seller: Identifier,
    pub buyer: Identifier,
    /// Energy traded, in kWh.
    pub energy: f64,
    /// Price per kWh.
    pub price: f64,
    /// `price * energy`.
    pub value: f64,
    pub timestamp: Timestamp,
    pub pair: PairKey,
}

impl TransactionRecord {
    pub(crate) fn new(
        id: Identifier,
        seller: Identifier,
        buyer: Identifier,
        draft: &TransactionDraft,
    ) -> Self {
        Self {
            id,
            seller,
            buyer,
            energy: draft.energy,
            price: draft.price,
            value: draft.value(),
            timestamp: draft.timestamp,
            pair: PairKey::new(seller, buyer),
        }
    }

    pub(crate) fn amend(&mut self, energy: f64, price: f64, timestamp: Timestamp) {
        self.energy = energy;
        self.price = price;
        self.value = price * energy;
        self.timestamp = timestamp;
    }
}
