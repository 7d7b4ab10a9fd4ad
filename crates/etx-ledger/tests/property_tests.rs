//! Property-based tests for ledger invariants.

use std::collections::HashSet;

use etx_ledger::{Ledger, LedgerConfig, RecordKey, Seller};
use etx_types::{Identifier, Timestamp, TransactionDraft};
use proptest::prelude::*;

fn payload() -> impl Strategy<Value = u32> {
    10_000u32..=99_999
}

fn identifier() -> impl Strategy<Value = u32> {
    payload().prop_map(|p| Identifier::from_payload(p).unwrap().value())
}

fn timestamp() -> impl Strategy<Value = Timestamp> {
    (1u32..=28, 1u32..=12, 1950i32..=2050, 0u32..24, 0u32..60)
        .prop_map(|(d, m, y, h, min)| Timestamp::new(d, m, y, h, min))
}

prop_compose! {
    fn trade(sellers: Vec<u32>, buyers: Vec<u32>)(
        id in identifier(),
        seller in proptest::sample::select(sellers),
        buyer in proptest::sample::select(buyers),
        energy in 0.5f64..1000.0,
        price in 0.5f64..100.0,
        timestamp in timestamp(),
    ) -> TransactionDraft {
        TransactionDraft::new(id, seller, buyer, energy, price, timestamp)
    }
}

fn book() -> impl Strategy<Value = Vec<TransactionDraft>> {
    (
        proptest::collection::vec(identifier(), 1..6),
        proptest::collection::vec(identifier(), 1..6),
    )
        .prop_flat_map(|(sellers, buyers)| proptest::collection::vec(trade(sellers, buyers), 0..80))
}

fn load(drafts: &[TransactionDraft], config: LedgerConfig) -> Ledger {
    let mut ledger = Ledger::new(config).unwrap();
    for draft in drafts {
        let _ = ledger.insert(*draft);
    }
    ledger
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn revenue_is_conserved_across_collections(drafts in book()) {
        let mut ledger = load(&drafts, LedgerConfig::default());
        ledger.rebuild_derived();

        let from_records: f64 = ledger.records().iter().map(|r| r.value).sum();
        let from_sellers: f64 = ledger.sellers().iter().map(|s| s.revenue).sum();
        let from_pairs: f64 = ledger.pairs().iter().map(|p| p.revenue).sum();
        prop_assert!(close(from_records, from_sellers));
        prop_assert!(close(from_records, from_pairs));

        let energy: f64 = ledger.records().iter().map(|r| r.energy).sum();
        let from_buyers: f64 = ledger.buyers().iter().map(|b| b.energy).sum();
        prop_assert!(close(energy, from_buyers));

        let counted: u32 = ledger.pairs().iter().map(|p| p.transactions).sum();
        prop_assert_eq!(counted as usize, ledger.len());
    }

    #[test]
    fn ids_stay_unique(drafts in book()) {
        let ledger = load(&drafts, LedgerConfig { index_buckets: 17, ..LedgerConfig::default() });
        let distinct: HashSet<u32> = drafts.iter().map(|d| d.id).collect();
        prop_assert_eq!(ledger.len(), distinct.len());
        for draft in &drafts {
            prop_assert!(ledger.contains(Identifier::new(draft.id).unwrap()));
        }
    }

    #[test]
    fn incremental_matches_rebuild(drafts in book()) {
        let incremental = load(&drafts, LedgerConfig::incremental());
        let mut rebuilt = load(&drafts, LedgerConfig::default());
        rebuilt.rebuild_derived();
        prop_assert_eq!(incremental.pairs(), rebuilt.pairs());
        prop_assert_eq!(incremental.buyers(), rebuilt.buyers());
        prop_assert_eq!(incremental.sellers().len(), rebuilt.sellers().len());
        for (a, b) in incremental.sellers().iter().zip(rebuilt.sellers()) {
            prop_assert_eq!(a.id, b.id);
            prop_assert_eq!(a.revenue, b.revenue);
            prop_assert_eq!(a.low_tier_price, b.low_tier_price);
            prop_assert_eq!(a.high_tier_price, b.high_tier_price);
            let regulars = |s: &Seller| -> HashSet<u32> {
                s.regular_buyers.iter().map(|buyer| buyer.value()).collect()
            };
            prop_assert_eq!(regulars(a), regulars(b));
        }
    }

    #[test]
    fn cached_sort_matches_fresh(drafts in book(), key in proptest::sample::select(RecordKey::ALL.to_vec())) {
        let mut cached = load(&drafts, LedgerConfig::default());
        cached.sort_records(key);
        prop_assert!(!cached.sort_records(key));
        let mut fresh = load(&drafts, LedgerConfig::default());
        fresh.sort_records(key);
        prop_assert_eq!(cached.records(), fresh.records());
    }
}
