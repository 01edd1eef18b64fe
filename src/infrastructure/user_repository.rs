use crate::domain::{Address, DomainError, User};
use crate::infrastructure::postgres::{is_unique_violation, map_sqlx_error};
use crate::infrastructure::repository::UserRepositoryTrait;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

// Name of the unique index over LOWER(email).
const EMAIL_CONSTRAINT: &str = "users_email_key";

const USER_COLUMNS: &str = "id, email, password_hash, name, \
     address_line1, address_line2, address_line3, address_town, address_county, address_postcode, \
     phone_number, created_at, updated_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    address_line1: String,
    address_line2: Option<String>,
    address_line3: Option<String>,
    address_town: String,
    address_county: Option<String>,
    address_postcode: String,
    phone_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            address: Address {
                line1: row.address_line1,
                line2: row.address_line2,
                line3: row.address_line3,
                town: row.address_town,
                county: row.address_county,
                postcode: row.address_postcode,
            },
            phone_number: row.phone_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_unique_email(err: sqlx::Error, email: &str) -> DomainError {
        if is_unique_violation(&err, EMAIL_CONSTRAINT) {
            DomainError::Conflict(format!("User with email {} already exists.", email))
        } else {
            map_sqlx_error(err)
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO users \
             (id, email, password_hash, name, address_line1, address_line2, address_line3, \
              address_town, address_county, address_postcode, phone_number, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.address.line1)
        .bind(&user.address.line2)
        .bind(&user.address.line3)
        .bind(&user.address.town)
        .bind(&user.address.county)
        .bind(&user.address.postcode)
        .bind(&user.phone_number)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_email(e, &user.email))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET email = $2, name = $3, address_line1 = $4, address_line2 = $5, \
             address_line3 = $6, address_town = $7, address_county = $8, address_postcode = $9, \
             phone_number = $10, updated_at = $11 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}",
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.address.line1)
        .bind(&user.address.line2)
        .bind(&user.address.line3)
        .bind(&user.address.town)
        .bind(&user.address.county)
        .bind(&user.address.postcode)
        .bind(&user.phone_number)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_unique_email(e, &user.email))?;
        row.map(User::from)
            .ok_or_else(|| DomainError::NotFound(format!("User not found with id: {}", user.id)))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("User not found with id: {}", id)));
        }
        Ok(())
    }
}
