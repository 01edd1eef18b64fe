use crate::application::account_number::AccountNumberAllocator;
use crate::application::ownership::require_owner;
use crate::domain::{require_account_number, Account, AccountType, DomainError, Principal};
use crate::infrastructure::repository::AccountRepositoryTrait;
use std::sync::Arc;
use tracing::{info, warn};

/// How many times a create races the uniqueness constraint before the
/// operation is reported as exhausted.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Account lifecycle: open, fetch, rename/retype, soft-delete. Every
/// operation takes the resolved principal explicitly; ownership is
/// checked before any read or mutation of an existing account.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    allocator: AccountNumberAllocator,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepositoryTrait>) -> Self {
        let allocator = AccountNumberAllocator::new(accounts.clone());
        Self {
            accounts,
            allocator,
        }
    }

    /// Opens a new account for the principal: fresh unique number, zero
    /// balance, GBP. A duplicate number raced past the allocator's probe
    /// is retried with a new number.
    pub async fn create_account(
        &self,
        principal: &Principal,
        name: String,
        account_type: AccountType,
    ) -> Result<Account, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Account name cannot be empty.".to_string(),
            ));
        }

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let account_number = self.allocator.allocate().await?;
            let account = Account::open(
                account_number,
                name.clone(),
                account_type,
                principal.user_id,
            );
            match self.accounts.insert(&account).await {
                Ok(()) => {
                    info!(
                        "Account {} created successfully for user {}",
                        account.account_number, principal.user_id
                    );
                    return Ok(account);
                }
                Err(DomainError::Conflict(_)) => {
                    // Lost the race on the uniqueness constraint; sample again.
                    warn!(
                        "Account number {} raced by a concurrent create, retrying",
                        account.account_number
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(DomainError::AllocationExhausted)
    }

    pub async fn get_account(
        &self,
        principal: &Principal,
        account_number: &str,
    ) -> Result<Account, DomainError> {
        let account = self.find_owned(principal, account_number).await?;
        Ok(account)
    }

    /// All non-deleted accounts owned by the principal, in creation order.
    pub async fn list_accounts(&self, principal: &Principal) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.find_active_by_owner(principal.user_id).await?;
        info!(
            "Found {} accounts for user {}",
            accounts.len(),
            principal.user_id
        );
        Ok(accounts)
    }

    /// Partial update: only supplied fields change. A blank or
    /// whitespace-only name is silently skipped rather than rejected.
    pub async fn update_account(
        &self,
        principal: &Principal,
        account_number: &str,
        name: Option<String>,
        account_type: Option<AccountType>,
    ) -> Result<Account, DomainError> {
        let mut account = self.find_owned(principal, account_number).await?;

        if let Some(name) = name {
            if !name.trim().is_empty() {
                account.name = name;
            }
        }
        if let Some(account_type) = account_type {
            account.account_type = account_type;
        }

        let updated = self.accounts.update_details(&account).await?;
        info!("Account {} updated successfully", updated.account_number);
        Ok(updated)
    }

    /// Soft delete. Only permitted at zero balance; history stays on disk
    /// but the account disappears from every subsequent lookup.
    pub async fn delete_account(
        &self,
        principal: &Principal,
        account_number: &str,
    ) -> Result<(), DomainError> {
        let account = self.find_owned(principal, account_number).await?;

        if !account.has_zero_balance() {
            return Err(DomainError::NonZeroBalance);
        }

        self.accounts.mark_deleted(account.id).await?;
        info!("Account {} deleted successfully", account_number);
        Ok(())
    }

    /// Shared lookup path: validates the number, resolves the active
    /// account, then enforces ownership. A missing account is `NotFound`
    /// before ownership is ever considered.
    async fn find_owned(
        &self,
        principal: &Principal,
        account_number: &str,
    ) -> Result<Account, DomainError> {
        require_account_number(account_number)?;
        let account = self
            .accounts
            .find_active_by_number(account_number)
            .await?
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))?;
        require_owner(principal, account.owner_id, "bank account details")?;
        Ok(account)
    }
}
