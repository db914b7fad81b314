use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Amount, Wallet, WalletId};

use super::{StoreError, WalletStore, ensure_non_negative};

/// Process-local wallet store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryWalletStore {
    balances: RwLock<HashMap<WalletId, Amount>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with `(id, balance)` pairs, taken as given like rows
    /// of an external table. Later duplicates win.
    pub fn with_wallets(wallets: impl IntoIterator<Item = (WalletId, Amount)>) -> Self {
        Self {
            balances: RwLock::new(wallets.into_iter().collect()),
        }
    }

    pub async fn create_wallet(
        &self,
        id: WalletId,
        opening_balance: Amount,
    ) -> Result<Wallet, StoreError> {
        ensure_non_negative(id, opening_balance)?;

        let mut balances = self.balances.write().await;
        if balances.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        balances.insert(id, opening_balance);
        Ok(Wallet::new(id, opening_balance))
    }

    pub async fn len(&self) -> usize {
        self.balances.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.balances.read().await.is_empty()
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        self.balances
            .read()
            .await
            .get(&id)
            .map(|balance| Wallet::new(id, *balance))
            .ok_or(StoreError::NotFound(id))
    }

    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError> {
        ensure_non_negative(id, balance)?;

        match self.balances.write().await.get_mut(&id) {
            Some(stored) => {
                *stored = balance;
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_set() {
        let store = MemoryWalletStore::with_wallets([(1, 300)]);
        assert_eq!(store.get_by_id(1).await.unwrap(), Wallet::new(1, 300));

        store.set_balance(1, 250).await.unwrap();
        assert_eq!(store.get_by_id(1).await.unwrap().balance, 250);
    }

    #[tokio::test]
    async fn test_missing_wallet() {
        let store = MemoryWalletStore::new();
        assert!(matches!(store.get_by_id(9).await, Err(StoreError::NotFound(9))));
        assert!(matches!(
            store.set_balance(9, 10).await,
            Err(StoreError::NotFound(9))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_negative_balance_rejected_without_write() {
        let store = MemoryWalletStore::with_wallets([(1, 100)]);
        assert!(matches!(
            store.set_balance(1, -20).await,
            Err(StoreError::NegativeBalance { id: 1, balance: -20 })
        ));
        assert_eq!(store.get_by_id(1).await.unwrap().balance, 100);
    }

    #[tokio::test]
    async fn test_create_wallet() {
        let store = MemoryWalletStore::new();
        store.create_wallet(1, 500).await.unwrap();
        assert!(matches!(
            store.create_wallet(1, 10).await,
            Err(StoreError::AlreadyExists(1))
        ));
        assert!(matches!(
            store.create_wallet(2, -1).await,
            Err(StoreError::NegativeBalance { .. })
        ));
        assert_eq!(store.len().await, 1);
    }
}
