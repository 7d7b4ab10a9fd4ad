//! Foundation types for the energy trade ledger (ETX).
//!
//! Every other ETX crate above `etx-check` depends on `etx-types`.
//!
//! # Key Types
//!
//! - [`Identifier`] -- six-digit number whose last digit is a dihedral check digit
//! - [`PairKey`] -- composite (seller, buyer) grouping key
//! - [`Timestamp`] -- minute-resolution trade time, range-checked to 1950..=2050
//! - [`TransactionDraft`] -- raw insert input, validated by the ledger

pub mod error;
pub mod identity;
pub mod temporal;
pub mod trade;

pub use error::TypeError;
pub use identity::{is_valid_identifier, Identifier, PairKey};
pub use temporal::{Timestamp, MAX_YEAR, MIN_YEAR};
pub use trade::TransactionDraft;
