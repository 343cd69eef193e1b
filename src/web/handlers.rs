use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::application::UserRegistry;
use crate::domain::{validation, AccountView, DomainError, UserView};

pub type AppState = Arc<UserRegistry>;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: String,
    pub account_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub message: String,
}

/// Body of deposit and withdraw requests. The amount is kept as a raw JSON
/// value holding the literal number text, so it is parsed exactly and
/// malformed input is reported as an invalid amount.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub amount: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
}

/// Maps core failures onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::UserNotFound(_) | DomainError::AccountNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DomainError::InvalidName
            | DomainError::InvalidAmount(_)
            | DomainError::HasOpenAccounts(_)
            | DomainError::Rejected(_) => StatusCode::BAD_REQUEST,
            DomainError::IdExhausted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (
            status,
            Json(MessageResponse {
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn amount_from(raw: &Value) -> Result<Decimal, DomainError> {
    match raw {
        // Numbers keep their literal text (`arbitrary_precision`).
        Value::Number(n) => validation::parse_amount(&n.to_string()),
        Value::String(s) => validation::parse_amount(s),
        other => Err(DomainError::InvalidAmount(other.to_string())),
    }
}

/// A body that does not deserialize carries no usable name.
fn user_request(
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<CreateUserRequest, DomainError> {
    payload.map(|Json(request)| request).map_err(|rejection| {
        debug!("Rejected create user body: {}", rejection.body_text());
        DomainError::InvalidName
    })
}

fn transaction_amount(
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Decimal, DomainError> {
    match payload {
        Ok(Json(request)) => amount_from(&request.amount),
        Err(rejection) => Err(DomainError::InvalidAmount(rejection.body_text())),
    }
}

pub async fn create_user(
    State(registry): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let name = user_request(payload)?.name.unwrap_or_default();
    let created = registry.create_user(&name)?;
    let location = format!("/api/users/{}", created.user_id);
    let message = format!(
        "User created successfully with User '{}', account {} and $100 deposit.",
        name.trim(),
        created.account_id
    );
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateUserResponse {
            user_id: created.user_id,
            account_id: created.account_id,
            message,
        }),
    ))
}

pub async fn list_users(State(registry): State<AppState>) -> Json<Vec<UserSummary>> {
    Json(
        registry
            .list_users()
            .into_iter()
            .map(|id| UserSummary { id })
            .collect(),
    )
}

pub async fn get_user(
    State(registry): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    Ok(Json(registry.get_user(&user_id)?))
}

pub async fn delete_user(
    State(registry): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    registry.delete_user(&user_id)?;
    Ok(Json(MessageResponse {
        message: format!("User with ID {} deleted successfully.", user_id),
    }))
}

pub async fn create_account(
    State(registry): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let created = registry.create_account(&user_id)?;
    let location = format!("/api/users/{}/accounts/{}", user_id, created.account_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateAccountResponse {
            account_id: created.account_id,
            balance: created.balance,
            message: "Account created successfully with $100 deposit.".to_string(),
        }),
    ))
}

pub async fn get_user_accounts(
    State(registry): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<AccountView>>, ApiError> {
    Ok(Json(registry.get_user_accounts(&user_id)?))
}

pub async fn get_account(
    State(registry): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> Result<Json<AccountView>, ApiError> {
    Ok(Json(registry.get_account(&user_id, &account_id)?))
}

pub async fn delete_account(
    State(registry): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    registry.delete_account(&user_id, &account_id)?;
    Ok(Json(MessageResponse {
        message: format!(
            "Account with ID {} deleted successfully for user {}.",
            account_id, user_id
        ),
    }))
}

pub async fn deposit(
    State(registry): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let amount = transaction_amount(payload)?;
    registry.deposit(&user_id, &account_id, amount)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn withdraw(
    State(registry): State<AppState>,
    Path((user_id, account_id)): Path<(String, String)>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let amount = transaction_amount(payload)?;
    registry.withdraw(&user_id, &account_id, amount)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
