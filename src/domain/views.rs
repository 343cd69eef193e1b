//! Read-only projections handed out by registry queries.

use rust_decimal::Decimal;
use serde::Serialize;

use super::{Account, User};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: String,
    pub user_name: String,
    pub accounts: Vec<AccountView>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        AccountView {
            account_id: account.id.clone(),
            balance: account.balance(),
        }
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            accounts: user.accounts.iter().map(AccountView::from).collect(),
        }
    }
}
