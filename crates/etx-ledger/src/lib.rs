//! Validated ledger of energy trades.
//!
//! This crate is the heart of ETX. It provides:
//! - `Ledger`: validated inserts and in-place updates over an owned record
//!   collection, with duplicate ids caught by a chained hash index
//! - `Aggregator`: folds records into per-seller, per-buyer, and per-pair
//!   accumulators, from scratch or one record at a time
//! - `merge_sort_by`: the stable bottom-up merge sort behind every
//!   collection ordering, with `RecordKey` selecting the record key
//! - `LedgerConfig`: index size, regular-buyer threshold, price tier
//!   boundary, and incremental aggregation

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ledger;
pub mod records;
pub mod seed;
pub mod sort;

pub use aggregate::{Aggregates, Aggregator, Buyer, Pair, Seller};
pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult, ValidationError, ValidationFailure};
pub use ledger::Ledger;
pub use records::TransactionRecord;
pub use seed::reference_trades;
pub use sort::{merge_sort_by, RecordKey, SortRequest};
