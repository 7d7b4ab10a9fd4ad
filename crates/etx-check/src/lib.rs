//! Check-digit primitives for the energy trade ledger (ETX).
//!
//! Every numeric identifier in ETX is six decimal digits: a five-digit
//! payload followed by one check digit. The check digit is computed by
//! folding the payload digits through the non-commutative dihedral group
//! D5 and taking the inverse of the result.
//!
//! # Key Types
//!
//! - [`check_digit`] / [`validate`] -- the scheme used by the ledger
//! - [`CheckScheme`] -- common interface over alternative schemes
//! - [`DetectionBenchmark`] -- measures how many transcription errors a
//!   scheme lets through

pub mod detection;
pub mod dihedral;
pub mod error;
pub mod scheme;

pub use detection::{DetectionBenchmark, DetectionReport, SchemeDetection};
pub use dihedral::{
    check_digit, validate, with_check_digit, IDENTIFIER_MAX, IDENTIFIER_MIN, PAYLOAD_MAX, PAYLOAD_MIN,
};
pub use error::CheckError;
pub use scheme::{
    all_schemes, CheckScheme, Damm, Dihedral, DigitSum, Luhn, PairedProducts, SquareSum, TripleProducts,
};
