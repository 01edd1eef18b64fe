pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use crate::application::services::{AccountService, TransactionService, UserService};
use crate::infrastructure::auth::AuthService;
use std::sync::Arc;

pub use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
    pub transaction_service: Arc<TransactionService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
}
