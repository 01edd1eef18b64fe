use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::projections::{AccountView, TransactionView, UserView};
use crate::application::services::{RegisterUser, TransactionCommand, UpdateUser};
use crate::infrastructure::auth::{AuthenticatedUser, LoginResponse};
use crate::web::dto::{
    CreateAccountRequest, CreateTransactionRequest, CreateUserRequest, LoginRequest,
    UpdateAccountRequest, UpdateUserRequest,
};
use crate::web::error::ApiError;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct ListAccountsResponse {
    pub accounts: Vec<AccountView>,
}

#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    pub transactions: Vec<TransactionView>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.validate().map_err(ApiError::from)?;
    let response = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(ApiError::from)?;
    let user = state
        .user_service
        .register(RegisterUser {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            address: payload.address.into(),
            phone_number: payload.phone_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    let user = state.user_service.get_user(&principal, id).await?;
    Ok(Json(UserView::from(&user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    payload.validate().map_err(ApiError::from)?;
    let user = state
        .user_service
        .update_user(
            &principal,
            id,
            UpdateUser {
                email: payload.email,
                name: payload.name,
                address: payload.address.map(Into::into),
                phone_number: payload.phone_number,
            },
        )
        .await?;
    Ok(Json(UserView::from(&user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_user(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_account(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "Received request to create account. Account name: {}, type: {}",
        payload.name, payload.account_type
    );
    payload.validate().map_err(ApiError::from)?;
    let account = state
        .account_service
        .create_account(&principal, payload.name, payload.account_type)
        .await?;
    Ok((StatusCode::CREATED, Json(AccountView::from(&account))))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<Json<ListAccountsResponse>, ApiError> {
    let accounts = state.account_service.list_accounts(&principal).await?;
    Ok(Json(ListAccountsResponse {
        accounts: accounts.iter().map(AccountView::from).collect(),
    }))
}

pub async fn fetch_account(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(account_number): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    let account = state
        .account_service
        .get_account(&principal, &account_number)
        .await?;
    Ok(Json(AccountView::from(&account)))
}

pub async fn update_account(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(account_number): Path<String>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<AccountView>, ApiError> {
    payload.validate().map_err(ApiError::from)?;
    let account = state
        .account_service
        .update_account(&principal, &account_number, payload.name, payload.account_type)
        .await?;
    Ok(Json(AccountView::from(&account)))
}

pub async fn delete_account(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(account_number): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .account_service
        .delete_account(&principal, &account_number)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_transaction(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(account_number): Path<String>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "Received request to create transaction for account {}. Type: {}, Amount: {}",
        account_number, payload.transaction_type, payload.amount
    );
    payload.validate().map_err(ApiError::from)?;
    let transaction = state
        .transaction_service
        .create_transaction(
            &principal,
            &account_number,
            TransactionCommand {
                amount: payload.amount,
                currency: payload.currency,
                transaction_type: payload.transaction_type,
                reference: payload.reference,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TransactionView::from_entity(&transaction, principal.user_id)),
    ))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path(account_number): Path<String>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let transactions = state
        .transaction_service
        .list_transactions(&principal, &account_number)
        .await?;
    Ok(Json(ListTransactionsResponse {
        transactions: transactions
            .iter()
            .map(|t| TransactionView::from_entity(t, principal.user_id))
            .collect(),
    }))
}

pub async fn fetch_transaction(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    Path((account_number, transaction_id)): Path<(String, String)>,
) -> Result<Json<TransactionView>, ApiError> {
    let transaction = state
        .transaction_service
        .get_transaction(&principal, &account_number, &transaction_id)
        .await?;
    Ok(Json(TransactionView::from_entity(
        &transaction,
        principal.user_id,
    )))
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
