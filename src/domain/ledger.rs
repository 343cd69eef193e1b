//! Balance rules for a single account.
//!
//! The ledger is pure: it takes the current balance and a requested amount
//! and either returns the new balance or the first rule the request breaks.
//! Callers persist the result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Balance every new account is opened with.
pub const OPENING_DEPOSIT: Decimal = dec!(100);

/// Largest amount accepted by a single deposit.
pub const MAX_DEPOSIT: Decimal = dec!(10000);

/// Balance that must remain after any withdrawal.
pub const MIN_RESIDUAL_BALANCE: Decimal = dec!(100);

/// Share of the current balance a single withdrawal may take.
pub const MAX_WITHDRAWAL_RATIO: Decimal = dec!(0.9);

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {amount}. Amount must be greater than zero")]
    NonPositiveAmount { amount: Decimal },
    #[error("Invalid deposit amount: {amount}. Deposit amount must be between 0 and {ceiling}")]
    DepositCeilingExceeded { amount: Decimal, ceiling: Decimal },
    #[error("Insufficient funds: available {balance}, requested {amount}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[error("Invalid withdrawal amount: {amount}. The withdrawal can be up to {cap} (90% of balance {balance}); allowable maximum is {allowable}")]
    WithdrawalCapExceeded {
        amount: Decimal,
        balance: Decimal,
        cap: Decimal,
        allowable: Decimal,
    },
    #[error("Invalid withdrawal amount: {amount}. The withdrawal should leave a balance >= {minimum}; allowable maximum is {allowable}")]
    BelowMinimumBalance {
        amount: Decimal,
        minimum: Decimal,
        allowable: Decimal,
    },
}

/// Largest amount a withdrawal from `balance` could take without breaking
/// any rule.
pub fn allowable_withdrawal(balance: Decimal) -> Decimal {
    let cap = balance * MAX_WITHDRAWAL_RATIO;
    let residual = balance - MIN_RESIDUAL_BALANCE;
    cap.min(residual).max(Decimal::ZERO)
}

pub fn deposit(balance: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount { amount });
    }
    if amount > MAX_DEPOSIT {
        return Err(LedgerError::DepositCeilingExceeded {
            amount,
            ceiling: MAX_DEPOSIT,
        });
    }
    Ok(balance + amount)
}

/// Rules are checked in a fixed order and the first violation is reported.
pub fn withdraw(balance: Decimal, amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount { amount });
    }
    if amount > balance {
        return Err(LedgerError::InsufficientFunds { balance, amount });
    }
    let cap = balance * MAX_WITHDRAWAL_RATIO;
    if amount > cap {
        return Err(LedgerError::WithdrawalCapExceeded {
            amount,
            balance,
            cap,
            allowable: allowable_withdrawal(balance),
        });
    }
    if balance - amount < MIN_RESIDUAL_BALANCE {
        return Err(LedgerError::BelowMinimumBalance {
            amount,
            minimum: MIN_RESIDUAL_BALANCE,
            allowable: allowable_withdrawal(balance),
        });
    }
    Ok(balance - amount)
}
