use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// Unvalidated input for a ledger insert.
///
/// Ids are raw numbers here; the ledger checks each one and reports every
/// failing field at once rather than stopping at the first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub id: u32,
    pub seller: u32,
    pub buyer: u32,
    /// Energy traded, in kWh.
    pub energy: f64,
    /// Price per kWh.
    pub price: f64,
    pub timestamp: Timestamp,
}

impl TransactionDraft {
    pub fn new(id: u32, seller: u32, buyer: u32, energy: f64, price: f64, timestamp: Timestamp) -> Self {
        Self {
            id,
            seller,
            buyer,
            energy,
            price,
            timestamp,
        }
    }

    /// `price * energy`.
    pub fn value(&self) -> f64 {
        self.price * self.energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_price_times_energy() {
        let draft = TransactionDraft::new(123455, 123455, 123400, 150.5, 25.0, Timestamp::new(1, 1, 2023, 10, 30));
        assert_eq!(draft.value(), 3762.5);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "id": 123455, "seller": 123455, "buyer": 123400,
            "energy": 150.5, "price": 25.0,
            "timestamp": {"year": 2023, "month": 1, "day": 1, "hour": 10, "minute": 30}
        }"#;
        let draft: TransactionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.timestamp, Timestamp::new(1, 1, 2023, 10, 30));
        assert_eq!(draft.buyer, 123400);
    }
}
