use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use banking_users::{create_router, SeededIdGenerator, UserRegistry};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(Arc::new(UserRegistry::new(Arc::new(SeededIdGenerator::new(11)))))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// Sends the body text untouched, so number literals reach the server as written.
async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, location, json)
}

async fn create_user(app: &Router, name: &str) -> (String, String) {
    let (status, _, body) = send(app, Method::POST, "/api/users", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["userId"].as_str().unwrap().to_string(),
        body["accountId"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_create_and_get_user() {
    let app = app();
    let (status, location, body) =
        send(&app, Method::POST, "/api/users", Some(json!({ "name": " Alice " }))).await;

    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["userId"].as_str().unwrap();
    let account_id = body["accountId"].as_str().unwrap();
    assert_eq!(location.as_deref(), Some(format!("/api/users/{user_id}").as_str()));
    assert_eq!(
        body["message"],
        format!("User created successfully with User 'Alice', account {account_id} and $100 deposit.")
    );

    let (status, _, body) = send(&app, Method::GET, &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id);
    assert_eq!(body["userName"], "Alice");
    assert_eq!(body["accounts"], json!([{ "accountId": account_id, "balance": 100 }]));

    let (status, _, body) = send(&app, Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": user_id }]));
}

#[tokio::test]
async fn test_invalid_name_is_bad_request() {
    let app = app();
    for payload in [json!({ "name": "Jane2" }), json!({ "name": "" }), json!({})] {
        let (status, _, body) = send(&app, Method::POST, "/api/users", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid user name"));
    }
}

#[tokio::test]
async fn test_deposit_and_withdraw() {
    let app = app();
    let (user_id, account_id) = create_user(&app, "Bob").await;
    let base = format!("/api/users/{user_id}/accounts/{account_id}");

    let (status, _, body) =
        send(&app, Method::PUT, &format!("{base}/deposit"), Some(json!({ "amount": 50 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _, body) =
        send(&app, Method::PUT, &format!("{base}/withdraw"), Some(json!({ "amount": 100 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("balance >= 100"));

    let (status, _, _) =
        send(&app, Method::PUT, &format!("{base}/withdraw"), Some(json!({ "amount": 40 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = send(&app, Method::GET, &base, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accountId": account_id, "balance": 110 }));
}

#[tokio::test]
async fn test_invalid_amounts() {
    let app = app();
    let (user_id, account_id) = create_user(&app, "Carol").await;
    let deposit = format!("/api/users/{user_id}/accounts/{account_id}/deposit");

    let (status, _, body) = send(&app, Method::PUT, &deposit, Some(json!({ "amount": "lots" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid amount"));

    let (status, _, _) = send(&app, Method::PUT, &deposit, Some(json!({ "amount": 10001 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, Method::PUT, &deposit, Some(json!({ "amount": 10000 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

async fn balance(app: &Router, account_uri: &str) -> Value {
    let (status, _, body) = send(app, Method::GET, account_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    body["balance"].clone()
}

#[tokio::test]
async fn test_deposit_literal_just_over_ceiling_is_rejected() {
    let app = app();
    let (user_id, account_id) = create_user(&app, "Ivan").await;
    let base = format!("/api/users/{user_id}/accounts/{account_id}");

    let (status, _, body) = send_raw(
        &app,
        Method::PUT,
        &format!("{base}/deposit"),
        Some("application/json"),
        r#"{ "amount": 10000.0000000000001 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("between 0 and 10000"));
    assert_eq!(balance(&app, &base).await, json!(100));

    let (status, _, _) = send_raw(
        &app,
        Method::PUT,
        &format!("{base}/deposit"),
        Some("application/json"),
        r#"{ "amount": 10000 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(balance(&app, &base).await, json!(10100));
}

#[tokio::test]
async fn test_withdraw_literal_just_over_cap_is_rejected() {
    let app = app();
    let (user_id, account_id) = create_user(&app, "Judy").await;
    let base = format!("/api/users/{user_id}/accounts/{account_id}");

    let (status, _, _) = send(&app, Method::PUT, &format!("{base}/deposit"), Some(json!({ "amount": 900 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(balance(&app, &base).await, json!(1000));

    let (status, _, body) = send_raw(
        &app,
        Method::PUT,
        &format!("{base}/withdraw"),
        Some("application/json"),
        r#"{ "amount": 900.0000000000001 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("The withdrawal can be up to 900"));
    assert_eq!(balance(&app, &base).await, json!(1000));

    let (status, _, _) = send_raw(
        &app,
        Method::PUT,
        &format!("{base}/withdraw"),
        Some("application/json"),
        r#"{ "amount": 900 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(balance(&app, &base).await, json!(100));
}

#[tokio::test]
async fn test_fractional_balance_is_reported_exactly() {
    let app = app();
    let (user_id, account_id) = create_user(&app, "Kim").await;
    let base = format!("/api/users/{user_id}/accounts/{account_id}");

    let (status, _, _) = send_raw(
        &app,
        Method::PUT,
        &format!("{base}/deposit"),
        Some("application/json"),
        r#"{ "amount": 0.0000000000000001 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = send_raw(&app, Method::GET, &base, None, "").await;
    assert_eq!(body["balance"].to_string(), "100.0000000000000001");
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let app = app();

    let (status, _, body) =
        send_raw(&app, Method::POST, "/api/users", Some("application/json"), r#"{ "name": 5 }"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid user name"));

    let (status, _, body) = send_raw(&app, Method::POST, "/api/users", None, r#"{ "name": "Al" }"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid user name"));
    assert_eq!(send(&app, Method::GET, "/api/users", None).await.2, json!([]));

    let (user_id, account_id) = create_user(&app, "Liam").await;
    let deposit = format!("/api/users/{user_id}/accounts/{account_id}/deposit");
    for (content_type, body) in [
        (Some("text/plain"), r#"{ "amount": 10 }"#),
        (Some("application/json"), r#"{ "amount": "#),
    ] {
        let (status, _, body) = send_raw(&app, Method::PUT, &deposit, content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid amount"));
    }
}

#[tokio::test]
async fn test_amount_checked_before_existence() {
    let app = app();
    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/users/NOBODY/accounts/0000000000000000/deposit",
        Some(json!({ "amount": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        "/api/users/NOBODY/accounts/0000000000000000/deposit",
        Some(json!({ "amount": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_lifecycle() {
    let app = app();
    let (user_id, first_account) = create_user(&app, "Dave").await;
    let accounts = format!("/api/users/{user_id}/accounts");

    let (status, location, body) = send(&app, Method::POST, &accounts, None).await;
    assert_eq!(status, StatusCode::CREATED);
    let second_account = body["accountId"].as_str().unwrap().to_string();
    assert_eq!(body["balance"], json!(100));
    assert_eq!(location, Some(format!("{accounts}/{second_account}")));

    let (status, _, body) = send(&app, Method::GET, &accounts, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _, body) = send(&app, Method::DELETE, &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("delete all associated accounts"));

    for account_id in [&first_account, &second_account] {
        let (status, _, _) =
            send(&app, Method::DELETE, &format!("{accounts}/{account_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, _) =
        send(&app, Method::DELETE, &format!("{accounts}/{first_account}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(&app, Method::DELETE, &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("User with ID {user_id} deleted successfully."));

    let (status, _, _) = send(&app, Method::GET, &format!("/api/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_user_routes_are_not_found() {
    let app = app();
    for (method, uri) in [
        (Method::GET, "/api/users/NOBODY"),
        (Method::DELETE, "/api/users/NOBODY"),
        (Method::POST, "/api/users/NOBODY/accounts"),
        (Method::GET, "/api/users/NOBODY/accounts"),
        (Method::GET, "/api/users/NOBODY/accounts/1234"),
    ] {
        let (status, _, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "User with ID NOBODY not found.");
    }
}

#[tokio::test]
async fn test_health() {
    let (status, _, _) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
