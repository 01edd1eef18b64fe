pub mod account;
pub mod error;
pub mod transaction;
pub mod user;

pub use account::*;
pub use error::*;
pub use transaction::*;
pub use user::*;
