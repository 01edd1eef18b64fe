use crate::application::ownership::require_owner;
use crate::domain::{
    parse_transaction_id, require_account_number, validate_amount, validate_reference, Account,
    DomainError, NewTransaction, Principal, Transaction, TransactionType,
};
use crate::infrastructure::repository::{AccountRepositoryTrait, TransactionRepositoryTrait};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Retry budget for the optimistic balance compare-and-swap. Conflicts
/// only occur when two writers hit the same account at once, so a small
/// budget is enough.
const MAX_APPLY_ATTEMPTS: usize = 5;

/// Command describing a transaction to apply against an account.
#[derive(Debug, Clone)]
pub struct TransactionCommand {
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
}

/// The ledger: applies deposits and withdrawals, keeping
/// `balance == sum of signed transaction amounts` and `balance >= 0`
/// under concurrent writers.
#[derive(Clone)]
pub struct TransactionService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    /// Applies a deposit or withdrawal. Validation happens before any
    /// mutation; the balance update and the ledger insert then commit as
    /// one unit of work. A concurrent writer moving the balance first
    /// triggers a bounded re-read-and-retry.
    pub async fn create_transaction(
        &self,
        principal: &Principal,
        account_number: &str,
        command: TransactionCommand,
    ) -> Result<Transaction, DomainError> {
        require_account_number(account_number)?;
        validate_amount(command.amount)?;
        validate_reference(command.reference.as_deref())?;

        let mut attempts = 0;
        loop {
            let account = self.find_owned(principal, account_number).await?;

            if !account.currency.eq_ignore_ascii_case(&command.currency) {
                return Err(DomainError::InvalidArgument(format!(
                    "Transaction currency must match account currency ({}).",
                    account.currency
                )));
            }

            let new_balance = match command.transaction_type {
                TransactionType::Deposit => account.balance + command.amount,
                TransactionType::Withdrawal => {
                    if account.balance < command.amount {
                        return Err(DomainError::InsufficientFunds {
                            available: account.balance,
                        });
                    }
                    account.balance - command.amount
                }
            };

            let new_transaction = NewTransaction {
                account_id: account.id,
                amount: command.amount,
                currency: account.currency.clone(),
                transaction_type: command.transaction_type,
                reference: command.reference.clone(),
                created_at: Utc::now(),
            };

            match self
                .transactions
                .apply(account.id, account.balance, new_balance, new_transaction)
                .await
            {
                Ok(transaction) => {
                    info!(
                        "Transaction (Type: {}, Amount: {}) created for account {} by user {}. Transaction ID: {}",
                        transaction.transaction_type,
                        transaction.amount,
                        account_number,
                        principal.user_id,
                        transaction.id
                    );
                    return Ok(transaction);
                }
                Err(DomainError::Conflict(reason)) => {
                    attempts += 1;
                    if attempts >= MAX_APPLY_ATTEMPTS {
                        warn!(
                            "Giving up on transaction against account {} after {} conflicts",
                            account_number, attempts
                        );
                        return Err(DomainError::Conflict(reason));
                    }
                    // Re-read the account and re-run the checks at the new balance.
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn list_transactions(
        &self,
        principal: &Principal,
        account_number: &str,
    ) -> Result<Vec<Transaction>, DomainError> {
        require_account_number(account_number)?;
        let account = self
            .find_owned_for(principal, account_number, "transactions")
            .await?;
        let transactions = self.transactions.find_by_account(account.id).await?;
        info!(
            "Found {} transactions for account {}",
            transactions.len(),
            account_number
        );
        Ok(transactions)
    }

    /// Lookup is scoped by account: an id that exists under a different
    /// account is `NotFound` here, never leaked.
    pub async fn get_transaction(
        &self,
        principal: &Principal,
        account_number: &str,
        transaction_id: &str,
    ) -> Result<Transaction, DomainError> {
        require_account_number(account_number)?;
        let transaction_id = parse_transaction_id(transaction_id)?;

        let account = self
            .find_owned_for(principal, account_number, "transaction")
            .await?;
        self.transactions
            .find_by_id_and_account(transaction_id, account.id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Transaction not found with id: {} for account: {}",
                    transaction_id, account_number
                ))
            })
    }

    async fn find_owned(
        &self,
        principal: &Principal,
        account_number: &str,
    ) -> Result<Account, DomainError> {
        self.find_owned_for(principal, account_number, "bank account details")
            .await
    }

    async fn find_owned_for(
        &self,
        principal: &Principal,
        account_number: &str,
        resource: &str,
    ) -> Result<Account, DomainError> {
        let account = self
            .accounts
            .find_active_by_number(account_number)
            .await?
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))?;
        require_owner(principal, account.owner_id, resource)?;
        Ok(account)
    }
}
