use std::sync::Arc;

use anyhow::Context;
use banking_ledger::application::services::{AccountService, TransactionService, UserService};
use banking_ledger::infrastructure::auth::AuthService;
use banking_ledger::infrastructure::config::AppConfig;
use banking_ledger::infrastructure::logging::{init_logging, LoggingConfig};
use banking_ledger::infrastructure::postgres::connect_pool;
use banking_ledger::infrastructure::{AccountRepository, TransactionRepository, UserRepository};
use banking_ledger::web::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let _log_guards = init_logging(Some(LoggingConfig::default()))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting banking ledger service");

    let config = AppConfig::from_env()?;
    let pool = connect_pool(&config).await?;

    let account_repository = Arc::new(AccountRepository::new(pool.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone()));
    let user_repository = Arc::new(UserRepository::new(pool));

    let state = AppState {
        account_service: Arc::new(AccountService::new(account_repository.clone())),
        transaction_service: Arc::new(TransactionService::new(
            account_repository.clone(),
            transaction_repository,
        )),
        user_service: Arc::new(UserService::new(
            user_repository.clone(),
            account_repository,
        )),
        auth_service: Arc::new(AuthService::new(user_repository, config.jwt_expiry_secs)),
    };

    let router = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
