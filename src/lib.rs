//! In-memory registry of bank users and their accounts.
//!
//! - **domain**: accounts, users, balance rules, input validation, views
//! - **application**: the `UserRegistry` that enforces cross-entity rules
//! - **infrastructure**: id generation, configuration, logging
//! - **web**: axum adapter mapping registry outcomes to HTTP responses

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod web;

// Re-export commonly used types
pub use application::{AccountCreated, UserCreated, UserRegistry};
pub use domain::{AccountView, DomainError, LedgerError, UserView};
pub use infrastructure::{AppConfig, IdGenerator, RandomIdGenerator, SeededIdGenerator};
pub use web::create_router;
