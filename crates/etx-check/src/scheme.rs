//! A common interface over check-digit schemes.
//!
//! [`Dihedral`] is the scheme the ledger enforces. The others exist so the
//! detection benchmark has something to compare against. They accept any
//! payload up to five digits (zero-padded); the dihedral scheme keeps its
//! strict `10000..=99999` domain.

use crate::dihedral::{self, number_digits, payload_digits, PAYLOAD_MAX};
use crate::error::CheckError;

/// A single-digit error-detecting code over five-digit payloads.
pub trait CheckScheme: Send + Sync {
    /// Short human-readable name.
    fn name(&self) -> &'static str;

    /// Compute the check digit for a payload.
    fn check_digit(&self, payload: u32) -> Result<u8, CheckError>;

    /// Validate a six-digit number (payload followed by check digit).
    fn validate(&self, full: u32) -> bool {
        if full > 999_999 {
            return false;
        }
        match self.check_digit(full / 10) {
            Ok(digit) => u32::from(digit) == full % 10,
            Err(_) => false,
        }
    }
}

fn padded_digits(payload: u32) -> Result<[u8; 5], CheckError> {
    if payload > PAYLOAD_MAX {
        return Err(CheckError::PayloadOutOfRange(payload));
    }
    Ok(payload_digits(payload))
}

/// The D5 scheme enforced on every ledger identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dihedral;

impl CheckScheme for Dihedral {
    fn name(&self) -> &'static str {
        "dihedral"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        dihedral::check_digit(payload)
    }

    fn validate(&self, full: u32) -> bool {
        dihedral::validate(full)
    }
}

/// Sum of the payload digits, mod 10.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigitSum;

impl CheckScheme for DigitSum {
    fn name(&self) -> &'static str {
        "digit-sum"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        let sum: u32 = padded_digits(payload)?.iter().map(|&d| u32::from(d)).sum();
        Ok((sum % 10) as u8)
    }
}

/// Sum of the squared payload digits, mod 10.
#[derive(Clone, Copy, Debug, Default)]
pub struct SquareSum;

impl CheckScheme for SquareSum {
    fn name(&self) -> &'static str {
        "square-sum"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        let sum: u32 = padded_digits(payload)?
            .iter()
            .map(|&d| u32::from(d) * u32::from(d))
            .sum();
        Ok((sum % 10) as u8)
    }
}

/// `(ab + bc + cd + de + ea) mod 10` over the cyclic payload digits.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairedProducts;

impl CheckScheme for PairedProducts {
    fn name(&self) -> &'static str {
        "paired-products"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        let d = padded_digits(payload)?.map(u32::from);
        let sum: u32 = (0..5).map(|i| d[i] * d[(i + 1) % 5]).sum();
        Ok((sum % 10) as u8)
    }
}

/// `(abc + bcd + cde + dea + eab) mod 10` over the cyclic payload digits.
#[derive(Clone, Copy, Debug, Default)]
pub struct TripleProducts;

impl CheckScheme for TripleProducts {
    fn name(&self) -> &'static str {
        "triple-products"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        let d = padded_digits(payload)?.map(u32::from);
        let sum: u32 = (0..5)
            .map(|i| d[i] * d[(i + 1) % 5] * d[(i + 2) % 5])
            .sum();
        Ok((sum % 10) as u8)
    }
}

/// The Luhn mod-10 scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Luhn;

fn luhn_double(digit: u8) -> u32 {
    let doubled = u32::from(digit) * 2;
    if doubled > 9 {
        doubled - 9
    } else {
        doubled
    }
}

impl CheckScheme for Luhn {
    fn name(&self) -> &'static str {
        "luhn"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        let digits = padded_digits(payload)?;
        // The rightmost payload digit sits next to the check digit, so it
        // is the first one doubled.
        let sum: u32 = digits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| if i % 2 == 0 { luhn_double(d) } else { u32::from(d) })
            .sum();
        Ok(((sum * 9) % 10) as u8)
    }

    fn validate(&self, full: u32) -> bool {
        if full > 999_999 {
            return false;
        }
        let sum: u32 = number_digits(full)
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| if i % 2 == 1 { luhn_double(d) } else { u32::from(d) })
            .sum();
        sum % 10 == 0
    }
}

/// Totally anti-symmetric quasigroup used by the Damm scheme.
const DAMM_TABLE: [[u8; 10]; 10] = [
    [0, 3, 1, 7, 5, 9, 8, 6, 4, 2],
    [7, 0, 9, 2, 1, 5, 4, 8, 6, 3],
    [4, 2, 0, 6, 8, 7, 1, 3, 5, 9],
    [1, 7, 5, 0, 9, 8, 3, 4, 2, 6],
    [6, 1, 2, 3, 0, 4, 5, 9, 7, 8],
    [3, 6, 7, 4, 2, 0, 9, 5, 8, 1],
    [5, 8, 6, 9, 7, 2, 0, 1, 3, 4],
    [8, 9, 4, 5, 3, 6, 2, 0, 1, 7],
    [9, 4, 3, 8, 6, 1, 7, 2, 0, 5],
    [2, 5, 8, 1, 4, 3, 6, 7, 9, 0],
];

fn damm_interim(digits: &[u8]) -> u8 {
    digits
        .iter()
        .fold(0u8, |interim, &d| DAMM_TABLE[interim as usize][d as usize])
}

/// The Damm quasigroup scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Damm;

impl CheckScheme for Damm {
    fn name(&self) -> &'static str {
        "damm"
    }

    fn check_digit(&self, payload: u32) -> Result<u8, CheckError> {
        Ok(damm_interim(&padded_digits(payload)?))
    }

    fn validate(&self, full: u32) -> bool {
        full <= 999_999 && damm_interim(&number_digits(full)) == 0
    }
}

/// Every scheme known to the benchmark, the ledger's own first.
pub fn all_schemes() -> Vec<Box<dyn CheckScheme>> {
    vec![
        Box::new(Dihedral),
        Box::new(DigitSum),
        Box::new(SquareSum),
        Box::new(PairedProducts),
        Box::new(TripleProducts),
        Box::new(Luhn),
        Box::new(Damm),
    ]
}
