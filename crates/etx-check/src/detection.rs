//! Error-detection benchmark for check-digit schemes.
//!
//! Two kinds of transcription error are simulated on valid six-digit
//! numbers: a single-digit substitution and a swap of two adjacent,
//! unequal digits. An error is *undetected* when the damaged number still
//! validates.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::dihedral::{number_digits, PAYLOAD_MAX, PAYLOAD_MIN};
use crate::scheme::CheckScheme;

const DIGITS: u32 = 6;

/// Detection figures for one scheme.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SchemeDetection {
    pub scheme: String,
    pub substitutions_tested: u64,
    pub undetected_substitutions: u64,
    pub transpositions_tested: u64,
    pub undetected_transpositions: u64,
}

impl SchemeDetection {
    fn new(scheme: &dyn CheckScheme) -> Self {
        Self {
            scheme: scheme.name().to_string(),
            ..Self::default()
        }
    }

    /// Percentage of substitutions that went unnoticed.
    pub fn substitution_rate(&self) -> f64 {
        percentage(self.undetected_substitutions, self.substitutions_tested)
    }

    /// Percentage of adjacent transpositions that went unnoticed.
    pub fn transposition_rate(&self) -> f64 {
        percentage(self.undetected_transpositions, self.transpositions_tested)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Result of a benchmark run, one row per scheme in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetectionReport {
    pub samples: usize,
    pub errors_per_sample: usize,
    pub schemes: Vec<SchemeDetection>,
}

impl DetectionReport {
    /// Look up the row for a scheme by name.
    pub fn get(&self, scheme: &str) -> Option<&SchemeDetection> {
        self.schemes.iter().find(|row| row.scheme == scheme)
    }
}

/// Randomised benchmark over a sample of distinct payloads.
#[derive(Clone, Debug)]
pub struct DetectionBenchmark {
    /// Number of distinct payloads drawn (capped at 90,000).
    pub samples: usize,
    /// Errors of each kind introduced per payload and scheme.
    pub errors_per_sample: usize,
    /// RNG seed; equal seeds reproduce equal reports.
    pub seed: u64,
}

impl Default for DetectionBenchmark {
    fn default() -> Self {
        Self {
            samples: 10_000,
            errors_per_sample: 50,
            seed: 0x00E7_C0DE,
        }
    }
}

impl DetectionBenchmark {
    /// Run the benchmark against every given scheme.
    pub fn run(&self, schemes: &[Box<dyn CheckScheme>]) -> DetectionReport {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut payloads: Vec<u32> = (PAYLOAD_MIN..=PAYLOAD_MAX).collect();
        payloads.shuffle(&mut rng);
        payloads.truncate(self.samples);

        let mut rows: Vec<SchemeDetection> =
            schemes.iter().map(|s| SchemeDetection::new(s.as_ref())).collect();

        for &payload in &payloads {
            for (scheme, row) in schemes.iter().zip(rows.iter_mut()) {
                let Ok(digit) = scheme.check_digit(payload) else {
                    continue;
                };
                let valid = payload * 10 + u32::from(digit);
                for _ in 0..self.errors_per_sample {
                    let damaged = random_substitution(valid, &mut rng);
                    row.substitutions_tested += 1;
                    if scheme.validate(damaged) {
                        row.undetected_substitutions += 1;
                    }

                    if let Some(damaged) = random_transposition(valid, &mut rng) {
                        row.transpositions_tested += 1;
                        if scheme.validate(damaged) {
                            row.undetected_transpositions += 1;
                        }
                    }
                }
            }
        }

        DetectionReport {
            samples: payloads.len(),
            errors_per_sample: self.errors_per_sample,
            schemes: rows,
        }
    }

    /// Enumerate every substitution and every unequal adjacent swap over
    /// the whole payload domain.
    pub fn exhaustive(scheme: &dyn CheckScheme) -> SchemeDetection {
        let mut row = SchemeDetection::new(scheme);
        for payload in PAYLOAD_MIN..=PAYLOAD_MAX {
            let Ok(digit) = scheme.check_digit(payload) else {
                continue;
            };
            let valid = payload * 10 + u32::from(digit);
            let digits = number_digits(valid);

            for position in 0..DIGITS as usize {
                for replacement in 0..10u8 {
                    if replacement == digits[position] {
                        continue;
                    }
                    let mut damaged = digits;
                    damaged[position] = replacement;
                    row.substitutions_tested += 1;
                    if scheme.validate(join(&damaged)) {
                        row.undetected_substitutions += 1;
                    }
                }
            }

            for position in 0..DIGITS as usize - 1 {
                if digits[position] == digits[position + 1] {
                    continue;
                }
                let mut damaged = digits;
                damaged.swap(position, position + 1);
                row.transpositions_tested += 1;
                if scheme.validate(join(&damaged)) {
                    row.undetected_transpositions += 1;
                }
            }
        }
        row
    }
}

fn join(digits: &[u8; 6]) -> u32 {
    digits.iter().fold(0, |acc, &d| acc * 10 + u32::from(d))
}

fn random_substitution(number: u32, rng: &mut StdRng) -> u32 {
    let mut digits = number_digits(number);
    let position = rng.gen_range(0..DIGITS as usize);
    let original = digits[position];
    let mut replacement = rng.gen_range(0..10u8);
    while replacement == original {
        replacement = rng.gen_range(0..10u8);
    }
    digits[position] = replacement;
    join(&digits)
}

/// Swap a random pair of adjacent unequal digits. `None` when every digit
/// is the same (e.g. `555555`), since no swap can change such a number.
fn random_transposition(number: u32, rng: &mut StdRng) -> Option<u32> {
    let mut digits = number_digits(number);
    let candidates: Vec<usize> = (0..DIGITS as usize - 1)
        .filter(|&i| digits[i] != digits[i + 1])
        .collect();
    let &position = candidates.choose(rng)?;
    digits.swap(position, position + 1);
    Some(join(&digits))
}
