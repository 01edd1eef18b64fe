use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DomainError, Principal};
use crate::infrastructure::repository::UserRepositoryTrait;
use crate::web::{error::ApiError, AppState};

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    Keys::new(secret.as_bytes())
});

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(DomainError::unexpected)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, DomainError> {
    let parsed = PasswordHash::new(password_hash).map_err(DomainError::unexpected)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepositoryTrait>,
    token_expiry_secs: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepositoryTrait>, token_expiry_secs: i64) -> Self {
        Self {
            users,
            token_expiry_secs,
        }
    }

    /// Verifies credentials and issues an access token. Unknown email and
    /// wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, DomainError> {
        let invalid =
            || DomainError::Unauthenticated("Invalid email or password.".to_string());

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Authentication failed for {}", email);
            return Err(invalid());
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now,
            exp: now + self.token_expiry_secs,
        };
        let token =
            encode(&Header::default(), &claims, &KEYS.encoding).map_err(DomainError::unexpected)?;

        info!("User {} authenticated successfully", user.id);
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_expiry_secs,
        })
    }

    /// Validates a bearer token and resolves the principal behind it. A
    /// token whose subject no longer exists is treated as unauthenticated.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, DomainError> {
        let rejected =
            || DomainError::Unauthenticated("Access token is missing or invalid.".to_string());

        let data = decode::<Claims>(token, &KEYS.decoding, &Validation::default())
            .map_err(|_| rejected())?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| rejected())?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(rejected)?;
        Ok(Principal::new(user.id))
    }
}

/// Extractor that turns the `Authorization: Bearer` header into a resolved
/// [`Principal`] before a handler runs.
pub struct AuthenticatedUser(pub Principal);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ApiError::from(DomainError::Unauthenticated(
                    "Access token is missing or invalid.".to_string(),
                ))
            })?;

        let principal = state.auth_service.resolve_principal(bearer.token()).await?;
        Ok(AuthenticatedUser(principal))
    }
}
