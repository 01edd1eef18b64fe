use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller identity, resolved outside the core and
/// passed explicitly into every operation that needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
}

impl Principal {
    pub fn new(user_id: Uuid) -> Self {
        Principal { user_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub town: String,
    pub county: Option<String>,
    pub postcode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 hash; the core never sees the plaintext credential.
    pub password_hash: String,
    pub name: String,
    pub address: Address,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        password_hash: String,
        name: String,
        address: Address,
        phone_number: String,
    ) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            address,
            phone_number,
            created_at: now,
            updated_at: now,
        }
    }
}
