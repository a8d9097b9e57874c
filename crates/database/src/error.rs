use sea_orm::DbErr;
use thiserror::Error;

/// Error kinds surfaced by the record-consistency services. The outer API
/// layer maps each kind to a user-facing status; this layer only guarantees
/// the kind and a machine-readable reason.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("caller is not allowed to perform this operation")]
    Forbidden,

    #[error("instructor is not assigned to this course offering")]
    NotAssigned,

    #[error("course offering is already closed")]
    AlreadyClosed,

    #[error("course offering is not closed")]
    NotClosed,

    #[error("active evaluation components would total {attempted:.2}%, exceeding 100%")]
    OverAllocation { attempted: f64 },

    #[error("{0}")]
    InvalidRange(String),

    #[error("a course cannot be its own prerequisite")]
    SelfReference,

    #[error("prerequisite must belong to an earlier curriculum level")]
    OrderingViolation,

    #[error("prerequisite edge already exists")]
    DuplicateEdge,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("transaction failed: {0}")]
    TransactionFailed(#[from] DbErr),
}

impl DomainError {
    /// Infrastructure failures roll back completely, so the caller may retry
    /// them; every other kind is deterministic and will fail the same way
    /// again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionFailed(_))
    }
}
