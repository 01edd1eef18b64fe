//! Pure mappings from persisted entities to the representations exposed
//! at the API boundary. Internal ids and credential material stay out of
//! the views; no invariant is enforced here.

use crate::domain::{Account, AccountType, Address, Transaction, TransactionType, User};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_number: String,
    pub sort_code: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub currency: String,
    pub created_timestamp: DateTime<Utc>,
    pub updated_timestamp: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        AccountView {
            account_number: account.account_number.clone(),
            sort_code: account.sort_code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            balance: account.balance,
            currency: account.currency.clone(),
            created_timestamp: account.created_at,
            updated_timestamp: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: i64,
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
    pub user_id: Uuid,
    pub created_timestamp: DateTime<Utc>,
}

impl TransactionView {
    pub fn from_entity(transaction: &Transaction, user_id: Uuid) -> Self {
        TransactionView {
            id: transaction.id,
            amount: transaction.amount,
            currency: transaction.currency.clone(),
            transaction_type: transaction.transaction_type,
            reference: transaction.reference.clone(),
            user_id,
            created_timestamp: transaction.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub address: Address,
    pub phone_number: String,
    pub created_timestamp: DateTime<Utc>,
    pub updated_timestamp: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            address: user.address.clone(),
            phone_number: user.phone_number.clone(),
            created_timestamp: user.created_at,
            updated_timestamp: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SORT_CODE;

    #[test]
    fn account_view_carries_no_internal_ids() {
        let account = Account::open(
            "00012345".to_string(),
            "Checking".to_string(),
            AccountType::Personal,
            Uuid::new_v4(),
        );
        let view = AccountView::from(&account);
        assert_eq!(view.account_number, "00012345");
        assert_eq!(view.sort_code, SORT_CODE);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("ownerId").is_none());
        assert_eq!(json["accountType"], "PERSONAL");
    }

    #[test]
    fn transaction_view_serializes_type_field() {
        let transaction = Transaction {
            id: 7,
            account_id: Uuid::new_v4(),
            amount: rust_decimal_macros::dec!(10.50),
            currency: "GBP".to_string(),
            transaction_type: TransactionType::Deposit,
            reference: Some("rent".to_string()),
            created_at: Utc::now(),
        };
        let user_id = Uuid::new_v4();
        let view = TransactionView::from_entity(&transaction, user_id);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "DEPOSIT");
        assert_eq!(json["userId"], user_id.to_string());
        assert_eq!(json["reference"], "rent");
    }

    #[test]
    fn user_view_omits_credentials() {
        let user = User::new(
            "alice@example.com".to_string(),
            "$argon2id$opaque".to_string(),
            "Alice".to_string(),
            Address::default(),
            "07700900000".to_string(),
        );
        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "alice@example.com");
    }
}
