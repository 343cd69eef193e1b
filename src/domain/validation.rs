//! Format checks on names and amounts supplied from outside the core.
//!
//! These only classify input as well-formed or not. Business limits on
//! amounts live in [`crate::domain::ledger`].

use std::str::FromStr;

use rust_decimal::Decimal;

use super::DomainError;

/// A name is valid when it has at least one letter and consists only of
/// ASCII letters and spaces. Callers trim before checking.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

pub fn is_valid_amount(raw: &str) -> bool {
    parse_amount(raw).is_ok()
}

/// Parses the literal text of an externally supplied number into an exact
/// decimal. Accepts plain (`"12.50"`) and scientific (`"1.5e3"`) notation.
pub fn parse_amount(raw: &str) -> Result<Decimal, DomainError> {
    let trimmed = raw.trim();
    let invalid = || DomainError::InvalidAmount(raw.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed).map_err(|_| invalid())
    } else {
        Decimal::from_str(trimmed).map_err(|_| invalid())
    }
}
