//! Uniqueness index for the energy trade ledger.
//!
//! A fixed-size hash table with chained buckets answering one question:
//! has this transaction id been seen before? Entries are never removed
//! individually; the whole table is cleared alongside the ledger.
//!
//! # Key Types
//!
//! - [`UniquenessIndex`] -- The bucket array and its chains
//! - [`IndexEntry`] -- A registered id with its cached hash
//! - [`IndexStats`] -- Occupancy figures for diagnostics

pub mod error;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::{IndexEntry, IndexStats, UniquenessIndex, DEFAULT_BUCKETS};
