use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::UserRegistry;
use crate::web::handlers::*;

pub fn create_router(registry: Arc<UserRegistry>) -> Router {
    Router::new()
        .route("/api/users", post(create_user).get(list_users))
        .route("/api/users/{user_id}", get(get_user).delete(delete_user))
        .route(
            "/api/users/{user_id}/accounts",
            post(create_account).get(get_user_accounts),
        )
        .route(
            "/api/users/{user_id}/accounts/{account_id}",
            get(get_account).delete(delete_account),
        )
        .route(
            "/api/users/{user_id}/accounts/{account_id}/deposit",
            put(deposit),
        )
        .route(
            "/api/users/{user_id}/accounts/{account_id}/withdraw",
            put(withdraw),
        )
        .route("/health", get(health_check))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
