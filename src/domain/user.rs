use serde::Serialize;

use super::Account;

/// A bank customer and the accounts they own, in creation order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub accounts: Vec<Account>,
}

impl User {
    /// Creates a user holding a single freshly opened account.
    pub fn new(id: String, name: String, account_id: String) -> Self {
        User {
            id,
            name,
            accounts: vec![Account::open(account_id)],
        }
    }

    pub fn has_open_accounts(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == account_id)
    }

    pub fn account_mut(&mut self, account_id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == account_id)
    }

    /// Removes the account, returning it if it belonged to this user.
    pub fn remove_account(&mut self, account_id: &str) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.id == account_id)?;
        Some(self.accounts.remove(index))
    }
}
