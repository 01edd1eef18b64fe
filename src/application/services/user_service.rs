use crate::application::ownership::require_owner;
use crate::domain::{Address, DomainError, Principal, User};
use crate::infrastructure::auth::hash_password;
use crate::infrastructure::repository::{AccountRepositoryTrait, UserRepositoryTrait};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub address: Address,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub address: Option<Address>,
    pub phone_number: Option<String>,
}

/// User identity management. A principal may only read, update, or
/// delete their own record.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
    ) -> Self {
        Self { users, accounts }
    }

    /// Registers a new user. The password is hashed before it reaches the
    /// repository; email uniqueness is case-insensitive.
    pub async fn register(&self, request: RegisterUser) -> Result<User, DomainError> {
        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "User with email {} already exists.",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            request.email,
            password_hash,
            request.name,
            request.address,
            request.phone_number,
        );
        self.users.insert(&user).await?;
        info!(
            "User with email {} registered successfully with ID: {}",
            user.email, user.id
        );
        Ok(user)
    }

    pub async fn get_user(&self, principal: &Principal, id: Uuid) -> Result<User, DomainError> {
        let user = self.find_user(id).await?;
        require_owner(principal, user.id, "user details")?;
        Ok(user)
    }

    /// Partial update: blank fields are skipped; an email change re-checks
    /// uniqueness against other users.
    pub async fn update_user(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateUser,
    ) -> Result<User, DomainError> {
        let mut user = self.find_user(id).await?;
        require_owner(principal, user.id, "user details")?;

        if let Some(email) = request.email {
            if !email.trim().is_empty() {
                if !user.email.eq_ignore_ascii_case(&email) {
                    if self.users.find_by_email(&email).await?.is_some() {
                        return Err(DomainError::Conflict(format!(
                            "Email {} is already taken.",
                            email
                        )));
                    }
                }
                user.email = email;
            }
        }
        if let Some(name) = request.name {
            if !name.trim().is_empty() {
                user.name = name;
            }
        }
        if let Some(address) = request.address {
            user.address = address;
        }
        if let Some(phone_number) = request.phone_number {
            if !phone_number.trim().is_empty() {
                user.phone_number = phone_number;
            }
        }

        let updated = self.users.update(&user).await?;
        info!("User with ID {} updated successfully", updated.id);
        Ok(updated)
    }

    /// Hard delete, refused while the user still owns any active account.
    pub async fn delete_user(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        let user = self.find_user(id).await?;
        require_owner(principal, user.id, "user details")?;

        let accounts = self.accounts.find_active_by_owner(user.id).await?;
        if !accounts.is_empty() {
            return Err(DomainError::Conflict(
                "User cannot be deleted as they have existing bank accounts.".to_string(),
            ));
        }

        self.users.delete(user.id).await?;
        info!("User with ID {} deleted successfully", id);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User not found with id: {}", id)))
    }
}
