//! The chained hash table behind duplicate-id detection.
//!
//! The [`UniquenessIndex`] owns a fixed `Vec` of buckets, each a chain of
//! [`IndexEntry`] values. Bucket selection folds the five least
//! significant decimal digits of the id into a polynomial hash. The bucket
//! count never changes after construction.

use serde::Serialize;
use tracing::debug;

use etx_types::Identifier;

use crate::error::{IndexError, IndexResult};

/// Bucket count used when none is configured. Prime.
pub const DEFAULT_BUCKETS: usize = 100_003;

const HASH_MULTIPLIER: u64 = 31;
const HASHED_DIGITS: usize = 5;

/// A registered transaction id together with its bucket hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: Identifier,
    pub hash: usize,
}

/// Occupancy figures for a [`UniquenessIndex`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub buckets: usize,
    pub occupied_buckets: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
}

/// Existence-only set of transaction ids.
pub struct UniquenessIndex {
    buckets: Vec<Vec<IndexEntry>>,
    entries: usize,
}

impl std::fmt::Debug for UniquenessIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniquenessIndex")
            .field("buckets", &self.buckets.len())
            .field("entries", &self.entries)
            .finish()
    }
}

impl UniquenessIndex {
    /// Create an empty index with `bucket_count` chains.
    pub fn new(bucket_count: usize) -> IndexResult<Self> {
        if bucket_count == 0 {
            return Err(IndexError::NoBuckets);
        }
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_count)
            .map_err(|_| IndexError::Allocation {
                what: format!("allocating {bucket_count} buckets"),
            })?;
        buckets.resize_with(bucket_count, Vec::new);
        Ok(Self {
            buckets,
            entries: 0,
        })
    }

    /// Bucket for `id`: `hash = (hash * 31 + digit) mod N` over the five
    /// least significant digits, least significant first.
    pub fn hash(&self, id: Identifier) -> usize {
        let modulus = self.buckets.len() as u64;
        let mut rest = u64::from(id.value());
        let mut hash = 0u64;
        for _ in 0..HASHED_DIGITS {
            hash = (hash * HASH_MULTIPLIER + rest % 10) % modulus;
            rest /= 10;
        }
        hash as usize
    }

    /// Returns `true` if `id` has been registered.
    pub fn contains(&self, id: Identifier) -> bool {
        let bucket = &self.buckets[self.hash(id)];
        bucket.iter().rev().any(|entry| entry.id == id)
    }

    /// Register `id`.
    ///
    /// Returns `Ok(false)` without touching the table if the id is already
    /// present. Chain growth is fallible and reported as
    /// [`IndexError::Allocation`].
    pub fn insert(&mut self, id: Identifier) -> IndexResult<bool> {
        let hash = self.hash(id);
        let chain = &mut self.buckets[hash];
        if chain.iter().any(|entry| entry.id == id) {
            return Ok(false);
        }
        chain.try_reserve(1).map_err(|_| IndexError::Allocation {
            what: format!("registering transaction id {id}"),
        })?;
        chain.push(IndexEntry { id, hash });
        self.entries += 1;
        debug!(id = id.value(), bucket = hash, chain = chain.len(), "registered id");
        Ok(true)
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
            chain.shrink_to_fit();
        }
        self.entries = 0;
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if no id is registered.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// The chain stored in bucket `index`, oldest entry first.
    pub fn chain(&self, index: usize) -> &[IndexEntry] {
        self.buckets.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        let occupied_buckets = self.buckets.iter().filter(|c| !c.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        IndexStats {
            entries: self.entries,
            buckets: self.buckets.len(),
            occupied_buckets,
            longest_chain,
            load_factor: self.entries as f64 / self.buckets.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> Identifier {
        Identifier::new(n).unwrap()
    }

    #[test]
    fn zero_buckets_rejected() {
        assert_eq!(UniquenessIndex::new(0).unwrap_err(), IndexError::NoBuckets);
    }

    #[test]
    fn hash_folds_low_digits_first() {
        let index = UniquenessIndex::new(DEFAULT_BUCKETS).unwrap();
        // Digits peeled from 123455: 5, 5, 4, 3, 2.
        let expected = (((5 * 31 + 5) * 31 + 4) * 31 + 3) * 31 + 2;
        assert_eq!(index.hash(id(123455)), expected % DEFAULT_BUCKETS);
    }

    #[test]
    fn hash_matches_digit_fold() {
        let index = UniquenessIndex::new(DEFAULT_BUCKETS).unwrap();
        let a = Identifier::from_payload(12345).unwrap();
        let hash = index.hash(a);
        assert!(hash < DEFAULT_BUCKETS);
        let expected = (0..5).fold((0usize, a.value() as usize), |(h, rest), _| {
            ((h * 31 + rest % 10) % DEFAULT_BUCKETS, rest / 10)
        });
        assert_eq!(hash, expected.0);
    }

    #[test]
    fn insert_then_contains() {
        let mut index = UniquenessIndex::new(DEFAULT_BUCKETS).unwrap();
        assert!(!index.contains(id(123455)));
        assert!(index.insert(id(123455)).unwrap());
        assert!(index.contains(id(123455)));
        assert!(!index.contains(id(123400)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn second_insert_is_a_no_op() {
        let mut index = UniquenessIndex::new(DEFAULT_BUCKETS).unwrap();
        assert!(index.insert(id(456783)).unwrap());
        assert!(!index.insert(id(456783)).unwrap());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn chains_hold_collisions() {
        let mut index = UniquenessIndex::new(3).unwrap();
        let ids: Vec<Identifier> = (10_000..10_020)
            .map(|p| Identifier::from_payload(p).unwrap())
            .collect();
        for &i in &ids {
            index.insert(i).unwrap();
        }
        for &i in &ids {
            assert!(index.contains(i));
        }
        let chained: usize = (0..3).map(|b| index.chain(b).len()).sum();
        assert_eq!(chained, ids.len());
        assert!(index.stats().longest_chain >= 7);
        for b in 0..3 {
            assert!(index.chain(b).iter().all(|e| e.hash == b));
        }
    }

    #[test]
    fn clear_empties_every_chain() {
        let mut index = UniquenessIndex::new(5).unwrap();
        for p in 20_000..20_010 {
            index.insert(Identifier::from_payload(p).unwrap()).unwrap();
        }
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 5);
        assert_eq!(index.stats().occupied_buckets, 0);
        assert!(!index.contains(Identifier::from_payload(20_000).unwrap()));
    }

    #[test]
    fn chain_out_of_range_is_empty() {
        let index = UniquenessIndex::new(5).unwrap();
        assert!(index.chain(99).is_empty());
    }

    #[test]
    fn stats_on_empty_index() {
        let stats = UniquenessIndex::new(11).unwrap().stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.buckets, 11);
        assert_eq!(stats.longest_chain, 0);
        assert_eq!(stats.load_factor, 0.0);
    }

    proptest! {
        #[test]
        fn every_inserted_id_is_found(
            payloads in proptest::collection::hash_set(10_000u32..=99_999, 1..200),
            buckets in 1usize..64,
        ) {
            let mut index = UniquenessIndex::new(buckets).unwrap();
            for &p in &payloads {
                prop_assert!(index.insert(Identifier::from_payload(p).unwrap()).unwrap());
            }
            prop_assert_eq!(index.len(), payloads.len());
            for &p in &payloads {
                prop_assert!(index.contains(Identifier::from_payload(p).unwrap()));
            }
        }
    }
}
