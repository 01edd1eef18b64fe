pub mod account_repository;
pub mod auth;
pub mod config;
pub mod logging;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod transaction_repository;
pub mod user_repository;

pub use account_repository::AccountRepository;
pub use auth::{AuthService, AuthenticatedUser};
pub use config::AppConfig;
pub use memory::InMemoryStore;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
