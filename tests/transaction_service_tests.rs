mod common;

use banking_ledger::application::services::TransactionCommand;
use banking_ledger::domain::{DomainError, TransactionType};
use common::{deposit, open_account, principal, setup, withdraw};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn deposit_withdraw_lifecycle_tracks_balance() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();

    deposit(&ctx, &owner, &number, dec!(100.50)).await;
    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, dec!(100.50));

    withdraw(&ctx, &owner, &number, dec!(25.25)).await.unwrap();
    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, dec!(75.25));

    // Overdraft attempt fails and leaves balance and history untouched.
    let err = withdraw(&ctx, &owner, &number, dec!(100.00))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::InsufficientFunds { available } if available == dec!(75.25)
    ));
    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, dec!(75.25));
    let history = ctx
        .transaction_service
        .list_transactions(&owner, &number)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);

    withdraw(&ctx, &owner, &number, dec!(75.25)).await.unwrap();
    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, Decimal::ZERO);

    ctx.account_service
        .delete_account(&owner, &number)
        .await
        .unwrap();
}

#[tokio::test]
async fn balance_always_equals_signed_sum_of_history() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();

    deposit(&ctx, &owner, &number, dec!(40.00)).await;
    deposit(&ctx, &owner, &number, dec!(2.50)).await;
    withdraw(&ctx, &owner, &number, dec!(12.25)).await.unwrap();
    deposit(&ctx, &owner, &number, dec!(0.01)).await;
    withdraw(&ctx, &owner, &number, dec!(30.00)).await.unwrap();

    let history = ctx
        .transaction_service
        .list_transactions(&owner, &number)
        .await
        .unwrap();
    let signed_sum: Decimal = history
        .iter()
        .map(|t| match t.transaction_type {
            TransactionType::Deposit => t.amount,
            TransactionType::Withdrawal => -t.amount,
        })
        .sum();

    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, signed_sum);
    assert!(account.balance >= Decimal::ZERO);
}

#[tokio::test]
async fn currency_mismatch_is_rejected_before_any_mutation() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();

    let err = ctx
        .transaction_service
        .create_transaction(
            &owner,
            &number,
            TransactionCommand {
                amount: dec!(10.00),
                currency: "USD".to_string(),
                transaction_type: TransactionType::Deposit,
                reference: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));

    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, Decimal::ZERO);
    let history = ctx
        .transaction_service
        .list_transactions(&owner, &number)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn currency_comparison_is_case_insensitive() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;

    let transaction = ctx
        .transaction_service
        .create_transaction(
            &owner,
            &account.account_number,
            TransactionCommand {
                amount: dec!(5.00),
                currency: "gbp".to_string(),
                transaction_type: TransactionType::Deposit,
                reference: Some("case test".to_string()),
            },
        )
        .await
        .unwrap();
    // The stored entry carries the account's canonical currency.
    assert_eq!(transaction.currency, "GBP");
}

#[tokio::test]
async fn invalid_amounts_are_rejected() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;

    for amount in [Decimal::ZERO, dec!(-5.00), dec!(1.001)] {
        let err = ctx
            .transaction_service
            .create_transaction(
                &owner,
                &account.account_number,
                TransactionCommand {
                    amount,
                    currency: "GBP".to_string(),
                    transaction_type: TransactionType::Deposit,
                    reference: None,
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, DomainError::InvalidArgument(_)),
            "amount {} should be rejected",
            amount
        );
    }
}

#[tokio::test]
async fn overlong_reference_is_rejected() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;

    let err = ctx
        .transaction_service
        .create_transaction(
            &owner,
            &account.account_number,
            TransactionCommand {
                amount: dec!(1.00),
                currency: "GBP".to_string(),
                transaction_type: TransactionType::Deposit,
                reference: Some("x".repeat(256)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));
}

#[tokio::test]
async fn transactions_against_foreign_or_deleted_accounts_fail() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();

    let err = withdraw(&ctx, &principal(), &number, dec!(1.00))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    ctx.account_service
        .delete_account(&owner, &number)
        .await
        .unwrap();
    let err = ctx
        .transaction_service
        .create_transaction(
            &owner,
            &number,
            TransactionCommand {
                amount: dec!(1.00),
                currency: "GBP".to_string(),
                transaction_type: TransactionType::Deposit,
                reference: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn get_transaction_validates_id_and_scopes_by_account() {
    let ctx = setup();
    let owner = principal();
    let first = open_account(&ctx, &owner, "First").await;
    let second = open_account(&ctx, &owner, "Second").await;

    let recorded = deposit(&ctx, &owner, &first.account_number, dec!(10.00)).await;

    // Well-formed id under the right account resolves.
    let fetched = ctx
        .transaction_service
        .get_transaction(&owner, &first.account_number, &recorded.id.to_string())
        .await
        .unwrap();
    assert_eq!(fetched, recorded);

    // Non-numeric id is malformed input, not a missing resource.
    let err = ctx
        .transaction_service
        .get_transaction(&owner, &first.account_number, "not-a-number")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));

    // An id that exists under a different account must not leak.
    let err = ctx
        .transaction_service
        .get_transaction(&owner, &second.account_number, &recorded.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn list_transactions_enforces_ownership() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    deposit(&ctx, &owner, &account.account_number, dec!(10.00)).await;

    let err = ctx
        .transaction_service
        .list_transactions(&principal(), &account.account_number)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_withdrawals_never_overdraw() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();
    deposit(&ctx, &owner, &number, dec!(100.00)).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ctx_number = number.clone();
        let service = ctx.transaction_service.clone();
        let principal = owner;
        handles.push(tokio::spawn(async move {
            service
                .create_transaction(
                    &principal,
                    &ctx_number,
                    TransactionCommand {
                        amount: dec!(30.00),
                        currency: "GBP".to_string(),
                        transaction_type: TransactionType::Withdrawal,
                        reference: None,
                    },
                )
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::InsufficientFunds { .. }) | Err(DomainError::Conflict(_)) => {}
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    // At most three 30.00 withdrawals fit into 100.00.
    assert!(successes <= 3);
    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(
        account.balance,
        dec!(100.00) - dec!(30.00) * Decimal::from(successes)
    );
    assert!(account.balance >= Decimal::ZERO);

    let history = ctx
        .transaction_service
        .list_transactions(&owner, &number)
        .await
        .unwrap();
    // One deposit plus exactly the successful withdrawals.
    assert_eq!(history.len(), 1 + successes as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_all_land_via_retry() {
    let ctx = setup();
    let owner = principal();
    let account = open_account(&ctx, &owner, "Checking").await;
    let number = account.account_number.clone();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let ctx_number = number.clone();
        let service = ctx.transaction_service.clone();
        let principal = owner;
        handles.push(tokio::spawn(async move {
            service
                .create_transaction(
                    &principal,
                    &ctx_number,
                    TransactionCommand {
                        amount: dec!(10.00),
                        currency: "GBP".to_string(),
                        transaction_type: TransactionType::Deposit,
                        reference: None,
                    },
                )
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let account = ctx.account_service.get_account(&owner, &number).await.unwrap();
    assert_eq!(account.balance, dec!(50.00));
}
