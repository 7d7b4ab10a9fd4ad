use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Returns `true` if `n` is a six-digit number carrying a correct check
/// digit.
pub fn is_valid_identifier(n: u32) -> bool {
    etx_check::validate(n)
}

/// A validated six-digit identifier: five payload digits and one check
/// digit.
///
/// Transaction, seller, and buyer ids all share this type. An
/// `Identifier` can only be built from a number that passes
/// [`etx_check::validate`], so holding one is proof of well-formedness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Identifier(u32);

impl Identifier {
    /// Validate and wrap a raw six-digit number.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        if is_valid_identifier(value) {
            Ok(Self(value))
        } else {
            Err(TypeError::InvalidIdentifier(value))
        }
    }

    /// Build an identifier by appending the check digit to a payload.
    pub fn from_payload(payload: u32) -> Result<Self, TypeError> {
        etx_check::with_check_digit(payload)
            .map(Self)
            .map_err(|_| TypeError::InvalidIdentifier(payload))
    }

    /// The full six-digit value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// The leading five digits.
    pub fn payload(self) -> u32 {
        self.0 / 10
    }

    /// The trailing check digit.
    pub fn check_digit(self) -> u8 {
        (self.0 % 10) as u8
    }
}

impl TryFrom<u32> for Identifier {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for u32 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl FromStr for Identifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|e| TypeError::Parse(format!("{s:?}: {e}")))?;
        Self::new(value)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Composite key for an ordered (seller, buyer) pair.
///
/// Encoded as `seller * 10^6 + buyer`. Both halves are six digits, so the
/// encoding is injective and ordering by key orders by seller first, then
/// buyer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey(u64);

const PAIR_SCALE: u64 = 1_000_000;

impl PairKey {
    pub fn new(seller: Identifier, buyer: Identifier) -> Self {
        Self(u64::from(seller.value()) * PAIR_SCALE + u64::from(buyer.value()))
    }

    /// The raw composite value.
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn seller(self) -> u32 {
        (self.0 / PAIR_SCALE) as u32
    }

    pub fn buyer(self) -> u32 {
        (self.0 % PAIR_SCALE) as u32
    }
}

impl fmt::Debug for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairKey({}->{})", self.seller(), self.buyer())
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}->{:06}", self.seller(), self.buyer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_accepts_valid_identifier() {
        let id = Identifier::new(123455).unwrap();
        assert_eq!(id.value(), 123455);
        assert_eq!(id.payload(), 12345);
        assert_eq!(id.check_digit(), 5);
    }

    #[test]
    fn new_rejects_bad_check_digit() {
        assert_eq!(
            Identifier::new(123456),
            Err(TypeError::InvalidIdentifier(123456))
        );
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Identifier::new(12345).is_err());
        assert!(Identifier::new(1_234_555).is_err());
    }

    #[test]
    fn from_payload_appends_digit() {
        let id = Identifier::from_payload(56789).unwrap();
        assert_eq!(id.value(), 567898);
        assert!(Identifier::from_payload(999).is_err());
    }

    #[test]
    fn parse_from_str() {
        let id: Identifier = " 123400 ".parse().unwrap();
        assert_eq!(id.value(), 123400);
        assert!(matches!("abc".parse::<Identifier>(), Err(TypeError::Parse(_))));
        assert!(matches!(
            "123401".parse::<Identifier>(),
            Err(TypeError::InvalidIdentifier(123401))
        ));
    }

    #[test]
    fn serde_rejects_invalid_numbers() {
        let id: Identifier = serde_json::from_str("123455").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "123455");
        assert!(serde_json::from_str::<Identifier>("123456").is_err());
    }

    #[test]
    fn display_is_zero_padded() {
        let id = Identifier::new(100004).unwrap();
        assert_eq!(format!("{id}"), "100004");
        assert_eq!(format!("{id:?}"), "Identifier(100004)");
    }

    #[test]
    fn pair_key_splits_back() {
        let seller = Identifier::new(123455).unwrap();
        let buyer = Identifier::new(123400).unwrap();
        let key = PairKey::new(seller, buyer);
        assert_eq!(key.value(), 123_455_123_400);
        assert_eq!(key.seller(), 123455);
        assert_eq!(key.buyer(), 123400);
        assert_eq!(format!("{key}"), "123455->123400");
    }

    #[test]
    fn pair_key_orders_by_seller_then_buyer() {
        let a = PairKey::new(Identifier::new(123455).unwrap(), Identifier::new(987644).unwrap());
        let b = PairKey::new(Identifier::new(200030).unwrap(), Identifier::new(100004).unwrap());
        assert!(a < b);
    }

    proptest! {
        #[test]
        fn every_payload_yields_an_identifier(payload in 10_000u32..=99_999) {
            let id = Identifier::from_payload(payload).unwrap();
            prop_assert_eq!(id.payload(), payload);
            prop_assert!(is_valid_identifier(id.value()));
        }

        #[test]
        fn pair_keys_are_injective(s1 in 10_000u32..=99_999, b1 in 10_000u32..=99_999,
                                   s2 in 10_000u32..=99_999, b2 in 10_000u32..=99_999) {
            let k1 = PairKey::new(Identifier::from_payload(s1).unwrap(), Identifier::from_payload(b1).unwrap());
            let k2 = PairKey::new(Identifier::from_payload(s2).unwrap(), Identifier::from_payload(b2).unwrap());
            prop_assert_eq!(k1 == k2, s1 == s2 && b1 == b2);
        }
    }
}
