use crate::domain::DomainError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Sort code shared by every account this service issues.
pub const SORT_CODE: &str = "10-10-10";
/// All accounts are opened in GBP; multi-currency is out of scope.
pub const ACCOUNT_CURRENCY: &str = "GBP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Personal,
    Business,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub sort_code: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub currency: String,
    pub is_deleted: bool,
    /// Owning user; the relation is an id, never a live back-reference.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Opens a fresh account: zero balance, GBP, shared sort code.
    pub fn open(
        account_number: String,
        name: String,
        account_type: AccountType,
        owner_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            account_number,
            sort_code: SORT_CODE.to_string(),
            name,
            account_type,
            balance: Decimal::ZERO,
            currency: ACCOUNT_CURRENCY.to_string(),
            is_deleted: false,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_zero_balance(&self) -> bool {
        self.balance == Decimal::ZERO
    }
}

/// Rejects blank account numbers before any lookup is attempted.
pub fn require_account_number(account_number: &str) -> Result<(), DomainError> {
    if account_number.trim().is_empty() {
        return Err(DomainError::InvalidArgument(
            "Account number cannot be empty.".to_string(),
        ));
    }
    Ok(())
}
