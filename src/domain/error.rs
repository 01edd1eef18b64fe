use rust_decimal::Decimal;
use thiserror::Error;

/// Domain-level failures surfaced by every core operation. The transport
/// layer maps these onto protocol status codes; nothing below this enum
/// leaks out of the core.
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Insufficient funds to process transaction. Current balance: {available}")]
    InsufficientFunds { available: Decimal },
    #[error("Account cannot be deleted if the balance is not zero.")]
    NonZeroBalance,
    #[error("{0}")]
    Conflict(String),
    #[error("Could not allocate a free account number.")]
    AllocationExhausted,
    // Detail is kept for logging only; Display stays generic so callers
    // never see internal state.
    #[error("An unexpected error occurred.")]
    Unexpected(String),
}

impl DomainError {
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        DomainError::Unexpected(err.to_string())
    }
}
