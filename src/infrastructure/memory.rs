//! In-memory persistence used by the test suite and local development.
//! Enforces the same contracts as the Postgres repositories: unique
//! account numbers (deleted rows included), case-insensitive unique
//! emails, and atomic balance-update-plus-insert behind one lock.

use crate::domain::{Account, DomainError, NewTransaction, Transaction, User};
use crate::infrastructure::repository::{
    AccountRepositoryTrait, TransactionRepositoryTrait, UserRepositoryTrait,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    accounts: HashMap<Uuid, Account>,
    transactions: Vec<Transaction>,
    next_transaction_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryStore {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state
            .accounts
            .values()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(DomainError::Conflict(format!(
                "Account number {} is already in use.",
                account.account_number
            )));
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_active_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.account_number == account_number && !a.is_deleted)
            .cloned())
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Account>, DomainError> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.owner_id == owner_id && !a.is_deleted)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn number_in_use(&self, account_number: &str) -> Result<bool, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .any(|a| a.account_number == account_number))
    }

    async fn update_details(&self, account: &Account) -> Result<Account, DomainError> {
        let mut state = self.state.lock().await;
        let stored = state
            .accounts
            .get_mut(&account.id)
            .filter(|a| !a.is_deleted)
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))?;
        stored.name = account.name.clone();
        stored.account_type = account.account_type;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        let stored = state
            .accounts
            .get_mut(&id)
            .filter(|a| !a.is_deleted)
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))?;
        stored.is_deleted = true;
        stored.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryStore {
    async fn apply(
        &self,
        account_id: Uuid,
        expected_balance: Decimal,
        new_balance: Decimal,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, DomainError> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .filter(|a| !a.is_deleted)
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))?;
        if account.balance != expected_balance {
            return Err(DomainError::Conflict(
                "Account balance changed concurrently.".to_string(),
            ));
        }
        account.balance = new_balance;
        account.updated_at = Utc::now();

        state.next_transaction_id += 1;
        let transaction = Transaction {
            id: state.next_transaction_id,
            account_id: new_transaction.account_id,
            amount: new_transaction.amount,
            currency: new_transaction.currency,
            transaction_type: new_transaction.transaction_type,
            reference: new_transaction.reference,
            created_at: new_transaction.created_at,
        };
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_account(
        &self,
        id: i64,
        account_id: Uuid,
    ) -> Result<Option<Transaction>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .find(|t| t.id == id && t.account_id == account_id)
            .cloned())
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::Conflict(format!(
                "User with email {} already exists.",
                user.email
            )));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.state.lock().await;
        let conflict = state
            .users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if conflict {
            return Err(DomainError::Conflict(format!(
                "User with email {} already exists.",
                user.email
            )));
        }
        let stored = state.users.get_mut(&user.id).ok_or_else(|| {
            DomainError::NotFound(format!("User not found with id: {}", user.id))
        })?;
        stored.email = user.email.clone();
        stored.name = user.name.clone();
        stored.address = user.address.clone();
        stored.phone_number = user.phone_number.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        state
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("User not found with id: {}", id)))
    }
}
