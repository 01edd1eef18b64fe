pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod web;

// Re-export commonly used types
pub use application::{AccountService, TransactionService, UserService};
pub use domain::DomainError;
pub use infrastructure::repository::{
    AccountRepositoryTrait, TransactionRepositoryTrait, UserRepositoryTrait,
};
pub use infrastructure::{AccountRepository, InMemoryStore, TransactionRepository, UserRepository};
