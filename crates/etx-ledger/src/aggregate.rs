//! Seller, buyer, and pair accumulators derived from the record
//! collection.
//!
//! The [`Aggregator`] folds records into [`Aggregates`]. Each collection
//! keeps first-seen order and a key-to-slot map so that a lookup per record
//! costs O(1) rather than a scan of the keys seen so far.

use std::collections::HashMap;

use serde::Serialize;

use etx_types::{Identifier, PairKey};

use crate::config::LedgerConfig;
use crate::records::TransactionRecord;
use crate::sort::{buyer_order, merge_sort_by, pair_order, seller_order};

/// Revenue accumulator for one seller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Seller {
    pub id: Identifier,
    pub revenue: f64,
    /// Price of the latest trade at or below the tier boundary.
    pub low_tier_price: Option<f64>,
    /// Price of the latest trade above the tier boundary.
    pub high_tier_price: Option<f64>,
    /// Buyers whose trade count with this seller reached the threshold,
    /// without repeats.
    pub regular_buyers: Vec<Identifier>,
}

impl Seller {
    fn new(id: Identifier) -> Self {
        Self {
            id,
            revenue: 0.0,
            low_tier_price: None,
            high_tier_price: None,
            regular_buyers: Vec::new(),
        }
    }

    fn add_regular_buyer(&mut self, buyer: Identifier) {
        if !self.regular_buyers.contains(&buyer) {
            self.regular_buyers.push(buyer);
        }
    }
}

/// Energy accumulator for one buyer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Buyer {
    pub id: Identifier,
    pub energy: f64,
}

/// Accumulator for one ordered (seller, buyer) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pair {
    pub key: PairKey,
    pub seller: Identifier,
    pub buyer: Identifier,
    pub transactions: u32,
    pub revenue: f64,
}

/// The three derived collections.
#[derive(Clone, Debug, Default)]
pub struct Aggregates {
    sellers: Vec<Seller>,
    buyers: Vec<Buyer>,
    pairs: Vec<Pair>,
    seller_slots: HashMap<Identifier, usize>,
    buyer_slots: HashMap<Identifier, usize>,
    pair_slots: HashMap<PairKey, usize>,
}

impl Aggregates {
    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    pub fn buyers(&self) -> &[Buyer] {
        &self.buyers
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn seller(&self, id: Identifier) -> Option<&Seller> {
        self.seller_slots.get(&id).map(|&slot| &self.sellers[slot])
    }

    pub fn buyer(&self, id: Identifier) -> Option<&Buyer> {
        self.buyer_slots.get(&id).map(|&slot| &self.buyers[slot])
    }

    pub fn pair(&self, key: PairKey) -> Option<&Pair> {
        self.pair_slots.get(&key).map(|&slot| &self.pairs[slot])
    }

    /// The pair with the most transactions. Ties go to the pair seen first
    /// in the current collection order.
    pub fn busiest_pair(&self) -> Option<&Pair> {
        let mut best: Option<&Pair> = None;
        for pair in &self.pairs {
            if best.map_or(true, |b| pair.transactions > b.transactions) {
                best = Some(pair);
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty() && self.buyers.is_empty() && self.pairs.is_empty()
    }

    /// Release sellers (with their regular-buyer lists), then buyers,
    /// then pairs.
    pub fn clear(&mut self) {
        self.sellers.clear();
        self.seller_slots.clear();
        self.buyers.clear();
        self.buyer_slots.clear();
        self.pairs.clear();
        self.pair_slots.clear();
    }

    pub(crate) fn sort_sellers(&mut self) {
        merge_sort_by(&mut self.sellers, seller_order);
        self.seller_slots = slots(&self.sellers, |s| s.id);
    }

    pub(crate) fn sort_buyers(&mut self) {
        merge_sort_by(&mut self.buyers, buyer_order);
        self.buyer_slots = slots(&self.buyers, |b| b.id);
    }

    pub(crate) fn sort_pairs(&mut self) {
        merge_sort_by(&mut self.pairs, pair_order);
        self.pair_slots = slots(&self.pairs, |p| p.key);
    }

    fn seller_mut(&mut self, id: Identifier) -> &mut Seller {
        let slot = slot_for(&mut self.seller_slots, &mut self.sellers, id, || Seller::new(id));
        &mut self.sellers[slot]
    }

    fn buyer_mut(&mut self, id: Identifier) -> &mut Buyer {
        let slot = slot_for(&mut self.buyer_slots, &mut self.buyers, id, || Buyer { id, energy: 0.0 });
        &mut self.buyers[slot]
    }

    fn pair_mut(&mut self, record: &TransactionRecord) -> &mut Pair {
        let slot = slot_for(&mut self.pair_slots, &mut self.pairs, record.pair, || Pair {
            key: record.pair,
            seller: record.seller,
            buyer: record.buyer,
            transactions: 0,
            revenue: 0.0,
        });
        &mut self.pairs[slot]
    }
}

/// Slot of `key`, appending a fresh accumulator on first sight.
fn slot_for<K, T, F>(slots: &mut HashMap<K, usize>, items: &mut Vec<T>, key: K, fresh: F) -> usize
where
    K: std::hash::Hash + Eq,
    F: FnOnce() -> T,
{
    *slots.entry(key).or_insert_with(|| {
        items.push(fresh());
        items.len() - 1
    })
}

fn slots<T, K, F>(items: &[T], key: F) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    items.iter().enumerate().map(|(slot, item)| (key(item), slot)).collect()
}

/// Folds records into [`Aggregates`].
#[derive(Clone, Debug)]
pub struct Aggregator {
    regular_buyer_threshold: u32,
    price_tier_boundary: f64,
}

impl Aggregator {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            regular_buyer_threshold: config.regular_buyer_threshold,
            price_tier_boundary: config.price_tier_boundary,
        }
    }

    /// Build all three collections from scratch.
    ///
    /// Regular buyers are assigned in a second pass over the finished
    /// pairs.
    pub fn fold(&self, records: &[TransactionRecord]) -> Aggregates {
        let mut aggregates = Aggregates::default();
        for record in records {
            self.accumulate(&mut aggregates, record);
        }

        let Aggregates { sellers, seller_slots, pairs, .. } = &mut aggregates;
        for pair in pairs.iter().filter(|p| p.transactions >= self.regular_buyer_threshold) {
            if let Some(&slot) = seller_slots.get(&pair.seller) {
                sellers[slot].add_regular_buyer(pair.buyer);
            }
        }
        aggregates
    }

    /// Fold one more record into collections that are already in sync.
    pub fn absorb(&self, aggregates: &mut Aggregates, record: &TransactionRecord) {
        let transactions = self.accumulate(aggregates, record);
        if transactions >= self.regular_buyer_threshold {
            aggregates.seller_mut(record.seller).add_regular_buyer(record.buyer);
        }
    }

    /// Returns the pair's transaction count after the update.
    fn accumulate(&self, aggregates: &mut Aggregates, record: &TransactionRecord) -> u32 {
        let seller = aggregates.seller_mut(record.seller);
        seller.revenue += record.value;
        if record.energy <= self.price_tier_boundary {
            seller.low_tier_price = Some(record.price);
        } else {
            seller.high_tier_price = Some(record.price);
        }

        aggregates.buyer_mut(record.buyer).energy += record.energy;

        let pair = aggregates.pair_mut(record);
        pair.transactions += 1;
        pair.revenue += record.value;
        pair.transactions
    }
}
