use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::{validation, Account, AccountView, DomainError, User, UserView};
use crate::infrastructure::identity::{IdGenerator, RandomIdGenerator};

/// Attempts made to draw an id that is not already in use.
const MAX_ID_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreated {
    pub user_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCreated {
    pub account_id: String,
    pub balance: Decimal,
}

#[derive(Debug, Default)]
struct RegistryState {
    users: HashMap<String, User>,
    /// User ids in creation order.
    order: Vec<String>,
    /// Every live account id across all users.
    account_ids: HashSet<String>,
}

impl RegistryState {
    fn user(&self, user_id: &str) -> Result<&User, DomainError> {
        self.users
            .get(user_id)
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut User, DomainError> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }

    fn account_mut(&mut self, user_id: &str, account_id: &str) -> Result<&mut Account, DomainError> {
        self.user_mut(user_id)?
            .account_mut(account_id)
            .ok_or_else(|| DomainError::AccountNotFound {
                user_id: user_id.to_string(),
                account_id: account_id.to_string(),
            })
    }
}

/// In-memory collection of users and their accounts.
///
/// All state sits behind one mutex, so every check-then-act sequence
/// (existence checks, ledger rules, the write itself) runs atomically with
/// respect to other callers. An operation either applies fully or not at all.
pub struct UserRegistry {
    state: Mutex<RegistryState>,
    ids: Arc<dyn IdGenerator>,
}

impl UserRegistry {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            ids,
        }
    }

    // Mutations only happen after every check has passed, so the state
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unique_user_id(&self, state: &RegistryState) -> Result<String, DomainError> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.new_user_id())
            .find(|id| !state.users.contains_key(id))
            .ok_or(DomainError::IdExhausted("user"))
    }

    fn unique_account_id(&self, state: &RegistryState) -> Result<String, DomainError> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| self.ids.new_account_id())
            .find(|id| !state.account_ids.contains(id))
            .ok_or(DomainError::IdExhausted("account"))
    }

    pub fn create_user(&self, name: &str) -> Result<UserCreated, DomainError> {
        let name = name.trim();
        if !validation::is_valid_name(name) {
            warn!(name, "Rejected user creation: invalid name");
            return Err(DomainError::InvalidName);
        }

        let mut state = self.lock();
        let user_id = self.unique_user_id(&state)?;
        let account_id = self.unique_account_id(&state)?;

        let user = User::new(user_id.clone(), name.to_string(), account_id.clone());
        state.account_ids.insert(account_id.clone());
        state.order.push(user_id.clone());
        state.users.insert(user_id.clone(), user);

        info!(user_id = %user_id, account_id = %account_id, "Created user with opening account");
        Ok(UserCreated {
            user_id,
            account_id,
        })
    }

    pub fn delete_user(&self, user_id: &str) -> Result<(), DomainError> {
        let mut state = self.lock();
        if state.user(user_id)?.has_open_accounts() {
            warn!(user_id, "Rejected user deletion: accounts still open");
            return Err(DomainError::HasOpenAccounts(user_id.to_string()));
        }

        state.users.remove(user_id);
        state.order.retain(|id| id != user_id);

        info!(user_id, "Deleted user");
        Ok(())
    }

    pub fn create_account(&self, user_id: &str) -> Result<AccountCreated, DomainError> {
        let mut state = self.lock();
        state.user(user_id)?;
        let account_id = self.unique_account_id(&state)?;

        let account = Account::open(account_id.clone());
        let balance = account.balance();
        state.account_ids.insert(account_id.clone());
        state.user_mut(user_id)?.accounts.push(account);

        info!(user_id, account_id = %account_id, "Opened account");
        Ok(AccountCreated {
            account_id,
            balance,
        })
    }

    /// Closes an account regardless of its remaining balance.
    pub fn delete_account(&self, user_id: &str, account_id: &str) -> Result<(), DomainError> {
        let mut state = self.lock();
        let removed = state.user_mut(user_id)?.remove_account(account_id).ok_or_else(|| {
            DomainError::AccountNotFound {
                user_id: user_id.to_string(),
                account_id: account_id.to_string(),
            }
        })?;
        state.account_ids.remove(account_id);

        info!(user_id, account_id, balance = %removed.balance(), "Closed account");
        Ok(())
    }

    /// Returns the new balance.
    pub fn deposit(&self, user_id: &str, account_id: &str, amount: Decimal) -> Result<Decimal, DomainError> {
        let mut state = self.lock();
        let account = state.account_mut(user_id, account_id)?;
        match account.deposit(amount) {
            Ok(balance) => {
                info!(user_id, account_id, amount = %amount, balance = %balance, "Deposit applied");
                Ok(balance)
            }
            Err(e) => {
                warn!(user_id, account_id, amount = %amount, "Deposit rejected: {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns the new balance.
    pub fn withdraw(&self, user_id: &str, account_id: &str, amount: Decimal) -> Result<Decimal, DomainError> {
        let mut state = self.lock();
        let account = state.account_mut(user_id, account_id)?;
        match account.withdraw(amount) {
            Ok(balance) => {
                info!(user_id, account_id, amount = %amount, balance = %balance, "Withdrawal applied");
                Ok(balance)
            }
            Err(e) => {
                warn!(user_id, account_id, amount = %amount, "Withdrawal rejected: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn get_user(&self, user_id: &str) -> Result<UserView, DomainError> {
        let state = self.lock();
        state.user(user_id).map(UserView::from)
    }

    /// User ids in creation order.
    pub fn list_users(&self) -> Vec<String> {
        let state = self.lock();
        debug!(count = state.order.len(), "Listing users");
        state.order.clone()
    }

    pub fn get_user_accounts(&self, user_id: &str) -> Result<Vec<AccountView>, DomainError> {
        let state = self.lock();
        let user = state.user(user_id)?;
        Ok(user.accounts.iter().map(AccountView::from).collect())
    }

    pub fn get_account(&self, user_id: &str, account_id: &str) -> Result<AccountView, DomainError> {
        let state = self.lock();
        state
            .user(user_id)?
            .account(account_id)
            .map(AccountView::from)
            .ok_or_else(|| DomainError::AccountNotFound {
                user_id: user_id.to_string(),
                account_id: account_id.to_string(),
            })
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new(Arc::new(RandomIdGenerator))
    }
}
