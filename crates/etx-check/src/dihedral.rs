//! Dihedral (D5) check digits.
//!
//! The ten decimal symbols are treated as elements of D5: `0..=4` are the
//! rotations and `5..=9` the reflections. Composition is read from
//! [`MULTIPLICATION`]. Because reflections do not commute, swapping two
//! adjacent digits changes the product whenever a reflection is involved.

use crate::error::CheckError;

/// Smallest five-digit payload.
pub const PAYLOAD_MIN: u32 = 10_000;
/// Largest five-digit payload.
pub const PAYLOAD_MAX: u32 = 99_999;
/// Smallest six-digit identifier (payload plus check digit).
pub const IDENTIFIER_MIN: u32 = 100_000;
/// Largest six-digit identifier.
pub const IDENTIFIER_MAX: u32 = 999_999;

/// Cayley table of D5.
pub const MULTIPLICATION: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position permutations. Only row 0 (the identity) takes part in the
/// fold; the table is kept whole so the digit mapping stays bit-compatible
/// with identifiers issued by older tooling.
pub const PERMUTATION: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Inverse of each element under [`MULTIPLICATION`].
pub const INVERSE: [u8; 10] = [0, 4, 3, 2, 1, 5, 9, 8, 7, 6];

const PERMUTATION_ROW: usize = 0;

fn compose(a: u8, b: u8) -> u8 {
    MULTIPLICATION[a as usize][PERMUTATION[PERMUTATION_ROW][b as usize] as usize]
}

/// Split a five-digit payload into its digits, most significant first.
pub(crate) fn payload_digits(payload: u32) -> [u8; 5] {
    let mut digits = [0u8; 5];
    let mut rest = payload;
    for slot in digits.iter_mut().rev() {
        *slot = (rest % 10) as u8;
        rest /= 10;
    }
    digits
}

/// Split a six-digit number into its digits, most significant first.
/// Shorter numbers come out zero-padded.
pub(crate) fn number_digits(number: u32) -> [u8; 6] {
    let mut digits = [0u8; 6];
    let mut rest = number;
    for slot in digits.iter_mut().rev() {
        *slot = (rest % 10) as u8;
        rest /= 10;
    }
    digits
}

/// Compute the check digit for a five-digit payload.
///
/// The digits `a1..a5` are folded right-associatively,
/// `c = f(a1, f(a2, f(a3, f(a4, a5))))`, and the inverse of `c` is
/// returned.
pub fn check_digit(payload: u32) -> Result<u8, CheckError> {
    if !(PAYLOAD_MIN..=PAYLOAD_MAX).contains(&payload) {
        return Err(CheckError::PayloadOutOfRange(payload));
    }
    let digits = payload_digits(payload);
    let folded = digits[..4]
        .iter()
        .rev()
        .fold(digits[4], |acc, &digit| compose(digit, acc));
    Ok(INVERSE[folded as usize])
}

/// Append the check digit to a payload, producing a six-digit identifier.
pub fn with_check_digit(payload: u32) -> Result<u32, CheckError> {
    Ok(payload * 10 + u32::from(check_digit(payload)?))
}

/// Returns `true` if `full` is a six-digit number whose last digit is the
/// check digit of its first five. Out-of-range input is simply invalid.
pub fn validate(full: u32) -> bool {
    if !(IDENTIFIER_MIN..=IDENTIFIER_MAX).contains(&full) {
        return false;
    }
    match check_digit(full / 10) {
        Ok(digit) => u32::from(digit) == full % 10,
        Err(_) => false,
    }
}
