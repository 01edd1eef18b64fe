use crate::domain::{Account, AccountType, DomainError};
use crate::infrastructure::postgres::{is_unique_violation, map_sqlx_error};
use crate::infrastructure::repository::AccountRepositoryTrait;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

const ACCOUNT_NUMBER_CONSTRAINT: &str = "bank_accounts_account_number_key";

const ACCOUNT_COLUMNS: &str = "id, account_number, sort_code, name, account_type, balance, \
     currency, is_deleted, owner_id, created_at, updated_at";

#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    account_number: String,
    sort_code: String,
    name: String,
    account_type: String,
    balance: Decimal,
    currency: String,
    is_deleted: bool,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_type = AccountType::from_str(&row.account_type)
            .map_err(|_| DomainError::unexpected(format!("unknown account type '{}' for account {}", row.account_type, row.id)))?;
        Ok(Account {
            id: row.id,
            account_number: row.account_number,
            sort_code: row.sort_code,
            name: row.name,
            account_type,
            balance: row.balance,
            currency: row.currency,
            is_deleted: row.is_deleted,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn insert(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO bank_accounts \
             (id, account_number, sort_code, name, account_type, balance, currency, is_deleted, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(account.id)
        .bind(&account.account_number)
        .bind(&account.sort_code)
        .bind(&account.name)
        .bind(account.account_type.to_string())
        .bind(account.balance)
        .bind(&account.currency)
        .bind(account.is_deleted)
        .bind(account.owner_id)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, ACCOUNT_NUMBER_CONSTRAINT) {
                DomainError::Conflict(format!(
                    "Account number {} is already in use.",
                    account.account_number
                ))
            } else {
                map_sqlx_error(e)
            }
        })?;
        Ok(())
    }

    async fn find_active_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts \
             WHERE account_number = $1 AND is_deleted = FALSE",
        ))
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(Account::try_from).transpose()
    }

    async fn find_active_by_owner(&self, owner_id: Uuid) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts \
             WHERE owner_id = $1 AND is_deleted = FALSE ORDER BY created_at",
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(Account::try_from).collect()
    }

    async fn number_in_use(&self, account_number: &str) -> Result<bool, DomainError> {
        // Deliberately unfiltered: deleted accounts keep their number forever.
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bank_accounts WHERE account_number = $1)",
        )
        .bind(account_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn update_details(&self, account: &Account) -> Result<Account, DomainError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE bank_accounts SET name = $2, account_type = $3, updated_at = $4 \
             WHERE id = $1 AND is_deleted = FALSE \
             RETURNING {ACCOUNT_COLUMNS}",
        ))
        .bind(account.id)
        .bind(&account.name)
        .bind(account.account_type.to_string())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(Account::try_from)
            .transpose()?
            .ok_or_else(|| DomainError::NotFound("Bank account was not found.".to_string()))
    }

    async fn mark_deleted(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE bank_accounts SET is_deleted = TRUE, updated_at = $2 \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(
                "Bank account was not found.".to_string(),
            ));
        }
        Ok(())
    }
}
