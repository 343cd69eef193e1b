pub mod account;
pub mod error;
pub mod ledger;
pub mod user;
pub mod validation;
pub mod views;

pub use account::*;
pub use error::*;
pub use user::*;
pub use views::*;

pub use ledger::LedgerError;
