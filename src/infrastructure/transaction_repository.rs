use crate::domain::{DomainError, NewTransaction, Transaction, TransactionType};
use crate::infrastructure::postgres::map_sqlx_error;
use crate::infrastructure::repository::TransactionRepositoryTrait;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

const TRANSACTION_COLUMNS: &str =
    "id, account_id, amount, currency, transaction_type, reference, created_at";

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: i64,
    account_id: Uuid,
    amount: Decimal,
    currency: String,
    transaction_type: String,
    reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DomainError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&row.transaction_type).map_err(|_| {
            DomainError::unexpected(format!(
                "unknown transaction type '{}' for transaction {}",
                row.transaction_type, row.id
            ))
        })?;
        Ok(Transaction {
            id: row.id,
            account_id: row.account_id,
            amount: row.amount,
            currency: row.currency,
            transaction_type,
            reference: row.reference,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn apply(
        &self,
        account_id: Uuid,
        expected_balance: Decimal,
        new_balance: Decimal,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, DomainError> {
        let mut db_tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Compare-and-swap on the balance serializes concurrent writers per
        // account; a mismatch means someone else committed first.
        let updated = sqlx::query(
            "UPDATE bank_accounts SET balance = $2, updated_at = $3 \
             WHERE id = $1 AND balance = $4 AND is_deleted = FALSE",
        )
        .bind(account_id)
        .bind(new_balance)
        .bind(Utc::now())
        .bind(expected_balance)
        .execute(&mut *db_tx)
        .await
        .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls back; no ledger entry is written.
            return Err(DomainError::Conflict(
                "Account balance changed concurrently.".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "INSERT INTO account_transactions \
             (account_id, amount, currency, transaction_type, reference, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TRANSACTION_COLUMNS}",
        ))
        .bind(new_transaction.account_id)
        .bind(new_transaction.amount)
        .bind(&new_transaction.currency)
        .bind(new_transaction.transaction_type.to_string())
        .bind(&new_transaction.reference)
        .bind(new_transaction.created_at)
        .fetch_one(&mut *db_tx)
        .await
        .map_err(map_sqlx_error)?;

        db_tx.commit().await.map_err(map_sqlx_error)?;
        row.try_into()
    }

    async fn find_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, DomainError> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM account_transactions \
             WHERE account_id = $1 ORDER BY id",
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn find_by_id_and_account(
        &self,
        id: i64,
        account_id: Uuid,
    ) -> Result<Option<Transaction>, DomainError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM account_transactions \
             WHERE id = $1 AND account_id = $2",
        ))
        .bind(id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        row.map(Transaction::try_from).transpose()
    }
}
