//! Multi-key merge sort.
//!
//! One stable bottom-up merge sort serves every collection the ledger
//! owns. Records choose a [`RecordKey`]; sellers, buyers, and pairs each
//! have a fixed ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::{Buyer, Pair, Seller};
use crate::records::TransactionRecord;

/// Sort key for the primary record collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKey {
    /// Calendar month only; year and day are ignored.
    Month,
    SellerId,
    BuyerId,
    /// Composite (seller, buyer) key.
    PairKey,
    /// Energy amount, ascending.
    Energy,
    /// Full timestamp, chronological.
    Time,
}

impl RecordKey {
    pub const ALL: [RecordKey; 6] = [
        RecordKey::Month,
        RecordKey::SellerId,
        RecordKey::BuyerId,
        RecordKey::PairKey,
        RecordKey::Energy,
        RecordKey::Time,
    ];

    pub fn compare(self, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
        match self {
            RecordKey::Month => a.timestamp.month.cmp(&b.timestamp.month),
            RecordKey::SellerId => a.seller.cmp(&b.seller),
            RecordKey::BuyerId => a.buyer.cmp(&b.buyer),
            RecordKey::PairKey => a.pair.cmp(&b.pair),
            RecordKey::Energy => a.energy.total_cmp(&b.energy),
            RecordKey::Time => a.timestamp.cmp(&b.timestamp),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RecordKey::Month => "month",
            RecordKey::SellerId => "seller-id",
            RecordKey::BuyerId => "buyer-id",
            RecordKey::PairKey => "pair-key",
            RecordKey::Energy => "energy",
            RecordKey::Time => "time",
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which collection to order, and by what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortRequest {
    Records(RecordKey),
    /// Sellers by revenue, ascending.
    Sellers,
    /// Buyers by accumulated energy, ascending.
    Buyers,
    /// Pairs by transaction count, ascending.
    Pairs,
}

pub fn seller_order(a: &Seller, b: &Seller) -> Ordering {
    a.revenue.total_cmp(&b.revenue)
}

pub fn buyer_order(a: &Buyer, b: &Buyer) -> Ordering {
    a.energy.total_cmp(&b.energy)
}

pub fn pair_order(a: &Pair, b: &Pair) -> Ordering {
    a.transactions.cmp(&b.transactions)
}

/// Sort `items` in place with a stable bottom-up merge sort.
///
/// Runs start at length one and adjacent runs are merged pairwise until a
/// single run remains. On equal keys the element from the left run wins,
/// so the relative order of equal elements is preserved. No recursion.
pub fn merge_sort_by<T, F>(items: &mut Vec<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }

    let mut runs: Vec<Vec<T>> = items.drain(..).map(|item| vec![item]).collect();
    while runs.len() > 1 {
        let mut merged = Vec::with_capacity(runs.len().div_ceil(2));
        let mut pending = runs.into_iter();
        while let Some(left) = pending.next() {
            match pending.next() {
                Some(right) => merged.push(merge(left, right, &mut compare)),
                None => merged.push(left),
            }
        }
        runs = merged;
    }

    if let Some(sorted) = runs.pop() {
        *items = sorted;
    }
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        out.extend(next);
    }
    out
}
