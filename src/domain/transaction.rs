use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Free-text references are capped at the column width.
pub const MAX_REFERENCE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

/// A ledger entry. Append-only: never updated or deleted once persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A transaction the ledger has validated but not yet persisted.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Monetary amounts must be strictly positive and carry at most two
/// decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount < dec!(0.01) {
        return Err(DomainError::InvalidArgument(
            "Amount must be positive.".to_string(),
        ));
    }
    if amount.normalize().scale() > 2 {
        return Err(DomainError::InvalidArgument(
            "Amount must have at most 2 decimal places.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_reference(reference: Option<&str>) -> Result<(), DomainError> {
    if let Some(reference) = reference {
        if reference.chars().count() > MAX_REFERENCE_LEN {
            return Err(DomainError::InvalidArgument(
                "Reference cannot exceed 255 characters.".to_string(),
            ));
        }
    }
    Ok(())
}

/// Transaction ids are numeric; anything else is malformed input, not a
/// missing resource.
pub fn parse_transaction_id(raw: &str) -> Result<i64, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::InvalidArgument(
            "Transaction ID cannot be empty.".to_string(),
        ));
    }
    raw.trim().parse::<i64>().map_err(|_| {
        DomainError::InvalidArgument(
            "Invalid transaction ID format. Must be a valid number.".to_string(),
        )
    })
}
