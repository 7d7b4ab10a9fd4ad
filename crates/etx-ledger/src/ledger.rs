use tracing::{debug, info, warn};

use etx_index::{IndexStats, UniquenessIndex};
use etx_types::{Identifier, Timestamp, TransactionDraft};

use crate::aggregate::{Aggregates, Aggregator, Buyer, Pair, Seller};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult, ValidationError, ValidationFailure};
use crate::records::TransactionRecord;
use crate::sort::{merge_sort_by, RecordKey, SortRequest};

/// In-memory store of validated energy trades.
///
/// Owns the record collection, the uniqueness index over transaction ids,
/// and the derived seller/buyer/pair collections. The derived collections
/// are refreshed by [`Ledger::rebuild_derived`]; between a mutation and
/// the next rebuild they may be stale (see [`Ledger::is_derived_stale`]).
pub struct Ledger {
    config: LedgerConfig,
    records: Vec<TransactionRecord>,
    index: UniquenessIndex,
    aggregator: Aggregator,
    derived: Aggregates,
    derived_stale: bool,
    sorted_by: Option<RecordKey>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .field("index", &self.index)
            .field("derived_stale", &self.derived_stale)
            .field("sorted_by", &self.sorted_by)
            .finish()
    }
}

fn is_positive(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let index = UniquenessIndex::new(config.index_buckets)?;
        Ok(Self {
            aggregator: Aggregator::new(&config),
            config,
            records: Vec::new(),
            index,
            derived: Aggregates::default(),
            derived_stale: false,
            sorted_by: None,
        })
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Validate and store a new trade.
    ///
    /// Every check runs, so a rejection lists all of its reasons. Nothing
    /// is modified unless the record is accepted.
    pub fn insert(&mut self, draft: TransactionDraft) -> LedgerResult<&TransactionRecord> {
        let (id, seller, buyer) = match self.check_draft(&draft) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(id = draft.id, failures = err.failures.len(), "insert rejected");
                return Err(err.into());
            }
        };

        self.records
            .try_reserve(1)
            .map_err(|_| LedgerError::Allocation {
                what: format!("storing transaction {id}"),
            })?;
        self.index.insert(id)?;

        let slot = self.records.len();
        self.records.push(TransactionRecord::new(id, seller, buyer, &draft));
        self.sorted_by = None;

        if self.config.incremental_aggregation && !self.derived_stale {
            self.aggregator.absorb(&mut self.derived, &self.records[slot]);
        } else {
            self.derived_stale = true;
        }

        debug!(id = id.value(), seller = seller.value(), buyer = buyer.value(), "inserted transaction");
        Ok(&self.records[slot])
    }

    fn check_draft(
        &self,
        draft: &TransactionDraft,
    ) -> Result<(Identifier, Identifier, Identifier), ValidationError> {
        let mut failures = Vec::new();

        if !draft.timestamp.is_valid() {
            failures.push(ValidationFailure::InvalidTimestamp(draft.timestamp));
        }

        let id = Identifier::new(draft.id);
        match id {
            Ok(id) if self.index.contains(id) => failures.push(ValidationFailure::DuplicateId(draft.id)),
            Ok(_) => {}
            Err(_) => failures.push(ValidationFailure::InvalidTransactionId(draft.id)),
        }

        let seller = Identifier::new(draft.seller);
        if seller.is_err() {
            failures.push(ValidationFailure::InvalidSellerId(draft.seller));
        }
        let buyer = Identifier::new(draft.buyer);
        if buyer.is_err() {
            failures.push(ValidationFailure::InvalidBuyerId(draft.buyer));
        }

        if !is_positive(draft.energy) {
            failures.push(ValidationFailure::NonPositiveEnergy(draft.energy));
        }
        if !is_positive(draft.price) {
            failures.push(ValidationFailure::NonPositivePrice(draft.price));
        }

        match (id, seller, buyer) {
            (Ok(id), Ok(seller), Ok(buyer)) if failures.is_empty() => Ok((id, seller, buyer)),
            _ => Err(ValidationError {
                id: draft.id,
                failures,
            }),
        }
    }

    /// Replace the energy, price, and timestamp of an existing trade.
    ///
    /// The id itself never changes, so the uniqueness index is untouched.
    /// Fails with [`LedgerError::EmptyLedger`] on an empty ledger, with a
    /// validation error if any new value is unacceptable, and with
    /// [`LedgerError::NotFound`] if no trade carries `id`.
    pub fn update(&mut self, id: u32, energy: f64, price: f64, timestamp: Timestamp) -> LedgerResult<()> {
        if self.records.is_empty() {
            warn!(id, "update on empty ledger");
            return Err(LedgerError::EmptyLedger);
        }

        let mut failures = Vec::new();
        let identifier = Identifier::new(id);
        if identifier.is_err() {
            failures.push(ValidationFailure::InvalidTransactionId(id));
        }
        if !is_positive(energy) {
            failures.push(ValidationFailure::NonPositiveEnergy(energy));
        }
        if !is_positive(price) {
            failures.push(ValidationFailure::NonPositivePrice(price));
        }
        if !timestamp.is_valid() {
            failures.push(ValidationFailure::InvalidTimestamp(timestamp));
        }

        let identifier = match identifier {
            Ok(identifier) if failures.is_empty() => identifier,
            _ => {
                warn!(id, failures = failures.len(), "update rejected");
                return Err(ValidationError { id, failures }.into());
            }
        };

        let Some(record) = self.records.iter_mut().find(|r| r.id == identifier) else {
            warn!(id, "update target missing");
            return Err(LedgerError::NotFound { id });
        };
        record.amend(energy, price, timestamp);
        self.sorted_by = None;
        self.derived_stale = true;

        debug!(id, energy, price, "updated transaction");
        Ok(())
    }

    /// Recompute sellers, buyers, and pairs from the current records,
    /// discarding the previous derived state.
    pub fn rebuild_derived(&mut self) {
        self.derived = self.aggregator.fold(&self.records);
        self.derived_stale = false;
        debug!(
            sellers = self.derived.sellers().len(),
            buyers = self.derived.buyers().len(),
            pairs = self.derived.pairs().len(),
            "rebuilt derived collections"
        );
    }

    /// Order one collection.
    ///
    /// Returns `false` when the records are already sorted by the requested
    /// key and the sort was skipped. Derived collections are always
    /// re-sorted.
    pub fn sort(&mut self, request: SortRequest) -> bool {
        match request {
            SortRequest::Records(key) => {
                if self.sorted_by == Some(key) {
                    debug!(%key, "records already sorted");
                    return false;
                }
                merge_sort_by(&mut self.records, |a, b| key.compare(a, b));
                self.sorted_by = Some(key);
                debug!(%key, records = self.records.len(), "sorted records");
            }
            SortRequest::Sellers => self.derived.sort_sellers(),
            SortRequest::Buyers => self.derived.sort_buyers(),
            SortRequest::Pairs => self.derived.sort_pairs(),
        }
        true
    }

    /// Shorthand for `sort(SortRequest::Records(key))`.
    pub fn sort_records(&mut self, key: RecordKey) -> bool {
        self.sort(SortRequest::Records(key))
    }

    /// Release everything: records, then sellers with their regular
    /// buyers, then buyers and pairs, then the uniqueness index.
    pub fn clear(&mut self) {
        let released = self.records.len();
        self.records.clear();
        self.records.shrink_to_fit();
        self.derived.clear();
        self.index.clear();
        self.sorted_by = None;
        self.derived_stale = false;
        info!(records = released, "ledger cleared");
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Total value of every trade by `seller`, scanned from the records
    /// rather than the derived sellers.
    pub fn revenue_of_seller(&self, seller: Identifier) -> LedgerResult<f64> {
        let mut matched = false;
        let mut revenue = 0.0;
        for record in self.records.iter().filter(|r| r.seller == seller) {
            matched = true;
            revenue += record.value;
        }
        if matched {
            Ok(revenue)
        } else {
            Err(LedgerError::SellerNotFound { id: seller.value() })
        }
    }

    /// The pair with the most trades, from the derived pairs. Call
    /// [`Ledger::rebuild_derived`] first if they are stale.
    pub fn pair_with_max_transactions(&self) -> Option<&Pair> {
        self.derived.busiest_pair()
    }

    /// Trades whose timestamp lies in the closed interval between `from`
    /// and `to`, in collection order. The bounds may be given either way
    /// round.
    pub fn records_between(&self, from: Timestamp, to: Timestamp) -> LedgerResult<Vec<&TransactionRecord>> {
        for bound in [from, to] {
            if !bound.is_valid() {
                return Err(LedgerError::InvalidTimestamp(bound));
            }
        }
        let (start, end) = if from > to { (to, from) } else { (from, to) };
        Ok(self
            .records
            .iter()
            .filter(|r| r.timestamp.is_within(&start, &end))
            .collect())
    }

    /// The trade with the largest energy amount; the earliest in
    /// collection order wins a tie.
    pub fn max_energy_transaction(&self) -> Option<&TransactionRecord> {
        let mut best: Option<&TransactionRecord> = None;
        for record in &self.records {
            if best.map_or(true, |b| record.energy > b.energy) {
                best = Some(record);
            }
        }
        best
    }

    pub fn get(&self, id: Identifier) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Returns `true` if a trade with `id` has been stored.
    pub fn contains(&self, id: Identifier) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn sellers(&self) -> &[Seller] {
        self.derived.sellers()
    }

    pub fn buyers(&self) -> &[Buyer] {
        self.derived.buyers()
    }

    pub fn pairs(&self) -> &[Pair] {
        self.derived.pairs()
    }

    pub fn derived(&self) -> &Aggregates {
        &self.derived
    }

    /// The key the records are currently ordered by, if any.
    pub fn sorted_by(&self) -> Option<RecordKey> {
        self.sorted_by
    }

    /// Returns `true` if records changed since the last rebuild.
    pub fn is_derived_stale(&self) -> bool {
        self.derived_stale
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }
}
