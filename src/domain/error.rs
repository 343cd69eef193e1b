use super::LedgerError;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid user name. Name should not contain numbers or special characters (except spaces), and it should not be empty.")]
    InvalidName,
    #[error("Invalid amount '{0}'. Amount should contain only numbers.")]
    InvalidAmount(String),
    #[error("User with ID {0} not found.")]
    UserNotFound(String),
    #[error("Account with ID {account_id} not found for user {user_id}.")]
    AccountNotFound { user_id: String, account_id: String },
    #[error("User with ID {0} still has open accounts. You have to delete all associated accounts first for the user.")]
    HasOpenAccounts(String),
    #[error(transparent)]
    Rejected(#[from] LedgerError),
    #[error("Could not generate a unique {0} identifier")]
    IdExhausted(&'static str),
}

impl DomainError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::UserNotFound(_) | DomainError::AccountNotFound { .. }
        )
    }
}
