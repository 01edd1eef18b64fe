use crate::domain::{Account, DomainError, NewTransaction, Transaction, User};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

/// Persistence collaborator for accounts. Soft-deleted rows are invisible
/// to every lookup except [`number_in_use`], which probes the full keyspace
/// so retired numbers are never reissued.
///
/// [`number_in_use`]: AccountRepositoryTrait::number_in_use
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Persists a freshly opened account. A raced duplicate account
    /// number surfaces as [`DomainError::Conflict`] via the storage-level
    /// uniqueness constraint.
    async fn insert(&self, account: &Account) -> Result<(), DomainError>;

    async fn find_active_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, DomainError>;

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Account>, DomainError>;

    /// True if any account, deleted or not, holds this number.
    async fn number_in_use(&self, account_number: &str) -> Result<bool, DomainError>;

    /// Persists name/type changes. Balance is owned by the ledger and is
    /// deliberately not written here.
    async fn update_details(&self, account: &Account) -> Result<Account, DomainError>;

    async fn mark_deleted(&self, id: Uuid) -> Result<(), DomainError>;
}

/// Persistence collaborator for ledger entries.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Writes the balance update and the transaction insert as one unit of
    /// work. The balance write is a compare-and-swap against
    /// `expected_balance`; a concurrent writer that moved the balance first
    /// causes the whole unit to roll back with [`DomainError::Conflict`],
    /// which the ledger treats as a retry signal.
    async fn apply(
        &self,
        account_id: Uuid,
        expected_balance: Decimal,
        new_balance: Decimal,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, DomainError>;

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, DomainError>;

    /// Lookup is always scoped by account so transaction ids never leak
    /// across ownership boundaries.
    async fn find_by_id_and_account(
        &self,
        id: i64,
        account_id: Uuid,
    ) -> Result<Option<Transaction>, DomainError>;
}

/// Persistence collaborator for user records. Email uniqueness is
/// case-insensitive and enforced at the storage level.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn update(&self, user: &User) -> Result<User, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
