pub mod account_number;
pub mod ownership;
pub mod projections;
pub mod services;

pub use account_number::AccountNumberAllocator;
pub use projections::{AccountView, TransactionView, UserView};
pub use services::{AccountService, TransactionService, UserService};
