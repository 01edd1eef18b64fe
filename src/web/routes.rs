use crate::web::handlers::*;
use crate::web::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/users", post(register_user))
        .route(
            "/v1/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/v1/accounts", post(create_account).get(list_accounts))
        .route(
            "/v1/accounts/{account_number}",
            get(fetch_account)
                .patch(update_account)
                .delete(delete_account),
        )
        .route(
            "/v1/accounts/{account_number}/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route(
            "/v1/accounts/{account_number}/transactions/{transaction_id}",
            get(fetch_transaction),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
