use etx_index::IndexError;
use etx_types::Timestamp;

/// One reason a candidate record was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("timestamp {0} is not a valid trade time")]
    InvalidTimestamp(Timestamp),

    #[error("transaction id {0} already exists")]
    DuplicateId(u32),

    #[error("transaction id {0} fails the check-digit test")]
    InvalidTransactionId(u32),

    #[error("seller id {0} fails the check-digit test")]
    InvalidSellerId(u32),

    #[error("buyer id {0} fails the check-digit test")]
    InvalidBuyerId(u32),

    #[error("energy amount {0} must be positive")]
    NonPositiveEnergy(f64),

    #[error("price per unit {0} must be positive")]
    NonPositivePrice(f64),
}

/// Every failed check for a single insert or update.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("transaction {id} rejected: {}", render(.failures))]
pub struct ValidationError {
    pub id: u32,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationError {
    pub fn contains(&self, failure: &ValidationFailure) -> bool {
        self.failures.contains(failure)
    }
}

fn render(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transaction {id} does not exist")]
    NotFound { id: u32 },

    #[error("seller {id} has no recorded transactions")]
    SellerNotFound { id: u32 },

    #[error("ledger has no transactions")]
    EmptyLedger,

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(Timestamp),

    #[error("allocation failed while {what}")]
    Allocation { what: String },

    #[error("index error: {0}")]
    Index(IndexError),
}

impl From<IndexError> for LedgerError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Allocation { what } => LedgerError::Allocation { what },
            other => LedgerError::Index(other),
        }
    }
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
