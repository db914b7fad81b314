mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common::sqlite_store;
use tempfile::TempDir;
use wallet_ledger::application::{LedgerError, WalletService};
use wallet_ledger::config::StoreBackend;
use wallet_ledger::domain::{AmountInput, Wallet};
use wallet_ledger::storage::{SqlWalletStore, SqliteWalletStore, StoreError, WalletStore};

#[tokio::test]
async fn test_get_by_id() -> Result<()> {
    let (store, _temp) = sqlite_store().await?;
    store.create_wallet(1, 300).await?;

    assert_eq!(store.get_by_id(1).await?, Wallet::new(1, 300));
    assert!(matches!(store.get_by_id(2).await, Err(StoreError::NotFound(2))));

    Ok(())
}

#[tokio::test]
async fn test_set_balance() -> Result<()> {
    let (store, _temp) = sqlite_store().await?;
    store.create_wallet(1, 200).await?;

    store.set_balance(1, 300).await?;
    assert_eq!(store.get_by_id(1).await?.balance, 300);

    assert!(matches!(
        store.set_balance(2, 10).await,
        Err(StoreError::NotFound(2))
    ));

    Ok(())
}

#[tokio::test]
async fn test_negative_balance_never_written() -> Result<()> {
    let (store, _temp) = sqlite_store().await?;
    store.create_wallet(1, 100).await?;

    assert!(matches!(
        store.set_balance(1, -20).await,
        Err(StoreError::NegativeBalance { id: 1, balance: -20 })
    ));
    assert_eq!(store.get_by_id(1).await?.balance, 100);

    Ok(())
}

#[tokio::test]
async fn test_create_wallet_rejects_duplicates() -> Result<()> {
    let (store, _temp) = sqlite_store().await?;
    store.create_wallet(1, 100).await?;

    assert!(matches!(
        store.create_wallet(1, 5).await,
        Err(StoreError::AlreadyExists(1))
    ));
    assert_eq!(store.get_by_id(1).await?.balance, 100);

    Ok(())
}

#[tokio::test]
async fn test_migrate_is_idempotent() -> Result<()> {
    let (store, _temp) = sqlite_store().await?;
    store.create_wallet(1, 42).await?;

    store.migrate().await?;
    assert_eq!(store.get_by_id(1).await?.balance, 42);

    Ok(())
}

#[tokio::test]
async fn test_missing_table_is_store_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("empty.db");
    let store = SqliteWalletStore::open(db_path.to_str().unwrap(), Duration::from_secs(1)).await?;

    assert!(matches!(store.get_by_id(1).await, Err(StoreError::Unavailable(_))));

    Ok(())
}

#[tokio::test]
async fn test_balances_persist_across_connections() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("wallets.db");
    let backend = StoreBackend::Sqlite {
        path: db_path.to_str().unwrap().to_string(),
        acquire_timeout: Duration::from_secs(5),
    };

    {
        let store = SqlWalletStore::open(&backend).await?;
        store.migrate().await?;
        store.create_wallet(1, 500).await?;

        let service = WalletService::new(Arc::new(store));
        service.deposit(1, AmountInput::Integer(100)).await?;
    }

    let store = SqlWalletStore::open(&backend).await?;
    let service = WalletService::new(Arc::new(store));
    assert_eq!(service.get_wallet(1).await?.balance, 600);

    let err = service
        .withdraw(1, AmountInput::Text("1000".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(service.get_wallet(1).await?.balance, 600);

    Ok(())
}
