use banking_ledger::application::services::{
    AccountService, RegisterUser, TransactionCommand, TransactionService, UserService,
};
use banking_ledger::domain::{
    Account, AccountType, Address, Principal, Transaction, TransactionType,
};
use banking_ledger::InMemoryStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub account_service: AccountService,
    pub transaction_service: TransactionService,
    pub user_service: UserService,
}

pub fn setup() -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    TestContext {
        account_service: AccountService::new(store.clone()),
        transaction_service: TransactionService::new(store.clone(), store.clone()),
        user_service: UserService::new(store.clone(), store.clone()),
        store,
    }
}

pub fn principal() -> Principal {
    Principal::new(Uuid::new_v4())
}

pub fn test_address() -> Address {
    Address {
        line1: "1 High Street".to_string(),
        line2: None,
        line3: None,
        town: "London".to_string(),
        county: None,
        postcode: "E1 6AN".to_string(),
    }
}

pub fn register_request(email: &str) -> RegisterUser {
    RegisterUser {
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        name: "Test User".to_string(),
        address: test_address(),
        phone_number: "07700900000".to_string(),
    }
}

pub async fn open_account(ctx: &TestContext, principal: &Principal, name: &str) -> Account {
    ctx.account_service
        .create_account(principal, name.to_string(), AccountType::Personal)
        .await
        .expect("account creation should succeed")
}

pub async fn deposit(
    ctx: &TestContext,
    principal: &Principal,
    account_number: &str,
    amount: Decimal,
) -> Transaction {
    ctx.transaction_service
        .create_transaction(
            principal,
            account_number,
            TransactionCommand {
                amount,
                currency: "GBP".to_string(),
                transaction_type: TransactionType::Deposit,
                reference: None,
            },
        )
        .await
        .expect("deposit should succeed")
}

pub async fn withdraw(
    ctx: &TestContext,
    principal: &Principal,
    account_number: &str,
    amount: Decimal,
) -> Result<Transaction, banking_ledger::DomainError> {
    ctx.transaction_service
        .create_transaction(
            principal,
            account_number,
            TransactionCommand {
                amount,
                currency: "GBP".to_string(),
                transaction_type: TransactionType::Withdrawal,
                reference: None,
            },
        )
        .await
}
