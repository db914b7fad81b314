// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;
use wallet_ledger::application::WalletService;
use wallet_ledger::domain::{Amount, RawOperation, Wallet, WalletId};
use wallet_ledger::storage::{MemoryWalletStore, SqliteWalletStore, StoreError, WalletStore};

/// Helper to create a migrated SQLite store in a temporary directory
pub async fn sqlite_store() -> Result<(SqliteWalletStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteWalletStore::open(db_path.to_str().unwrap(), Duration::from_secs(5)).await?;
    store.migrate().await?;
    Ok((store, temp_dir))
}

/// Helper to create a service over an in-memory store seeded with wallets
pub fn memory_service(wallets: &[(WalletId, Amount)]) -> (WalletService, Arc<MemoryWalletStore>) {
    let store = Arc::new(MemoryWalletStore::with_wallets(wallets.iter().copied()));
    (WalletService::new(store.clone()), store)
}

/// Build a raw operation the way a JSON client would send it
pub fn raw_op(wallet_id: Value, operation_type: Value, amount: Value) -> RawOperation {
    RawOperation::new(wallet_id, operation_type, amount)
}

/// Wraps a store and sleeps around every call, widening the window in which
/// unsynchronized read-modify-write cycles would interleave.
pub struct SlowStore<S> {
    inner: S,
    delay: Duration,
}

impl<S> SlowStore<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl<S: WalletStore> WalletStore for SlowStore<S> {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        let wallet = self.inner.get_by_id(id).await;
        tokio::time::sleep(self.delay).await;
        wallet
    }

    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set_balance(id, balance).await
    }
}

/// A store whose reads or writes can be switched to fail as if the
/// database were unreachable.
pub struct FlakyStore {
    inner: MemoryWalletStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(wallets: &[(WalletId, Amount)]) -> Self {
        Self {
            inner: MemoryWalletStore::with_wallets(wallets.iter().copied()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn stored_balance(&self, id: WalletId) -> Amount {
        self.inner.get_by_id(id).await.unwrap().balance
    }
}

#[async_trait]
impl WalletStore for FlakyStore {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")));
        }
        self.inner.get_by_id(id).await
    }

    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow::anyhow!("connection reset")));
        }
        self.inner.set_balance(id, balance).await
    }
}
