pub mod account_service;
pub mod transaction_service;
pub mod user_service;

pub use account_service::AccountService;
pub use transaction_service::{TransactionCommand, TransactionService};
pub use user_service::{RegisterUser, UpdateUser, UserService};
