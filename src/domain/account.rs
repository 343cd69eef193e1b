use rust_decimal::Decimal;
use serde::Serialize;

use super::ledger::{self, LedgerError, OPENING_DEPOSIT};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Account {
    pub id: String,
    balance: Decimal,
}

impl Account {
    /// Opens an account holding the fixed opening deposit.
    pub fn open(id: String) -> Self {
        Account {
            id,
            balance: OPENING_DEPOSIT,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Applies a deposit. The balance is left untouched on rejection.
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.balance = ledger::deposit(self.balance, amount)?;
        Ok(self.balance)
    }

    /// Applies a withdrawal. The balance is left untouched on rejection.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.balance = ledger::withdraw(self.balance, amount)?;
        Ok(self.balance)
    }
}
