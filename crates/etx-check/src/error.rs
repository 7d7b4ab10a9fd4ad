use thiserror::Error;

/// Errors produced by check-digit computation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("payload {0} is not a five-digit number (10000..=99999)")]
    PayloadOutOfRange(u32),
}
