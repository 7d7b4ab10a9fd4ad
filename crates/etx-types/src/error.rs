use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier {0} fails the check-digit test")]
    InvalidIdentifier(u32),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("parse error: {0}")]
    Parse(String),
}
