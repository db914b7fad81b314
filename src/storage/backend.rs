use anyhow::Result;
use async_trait::async_trait;

use crate::config::StoreBackend;
use crate::domain::{Amount, Wallet, WalletId};

use super::{PgWalletStore, SqliteWalletStore, StoreError, WalletStore};

/// A SQL wallet store chosen at runtime from configuration.
pub enum SqlWalletStore {
    Sqlite(SqliteWalletStore),
    Postgres(PgWalletStore),
}

impl SqlWalletStore {
    /// Connect to the configured backend. Fails if the database cannot be
    /// reached within the acquire timeout.
    pub async fn open(backend: &StoreBackend) -> Result<Self> {
        match backend {
            StoreBackend::Sqlite {
                path,
                acquire_timeout,
            } => Ok(Self::Sqlite(
                SqliteWalletStore::open(path, *acquire_timeout).await?,
            )),
            StoreBackend::Postgres(config) => {
                Ok(Self::Postgres(PgWalletStore::connect(config).await?))
            }
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.migrate().await,
            Self::Postgres(store) => store.migrate().await,
        }
    }

    pub async fn create_wallet(
        &self,
        id: WalletId,
        opening_balance: Amount,
    ) -> Result<Wallet, StoreError> {
        match self {
            Self::Sqlite(store) => store.create_wallet(id, opening_balance).await,
            Self::Postgres(store) => store.create_wallet(id, opening_balance).await,
        }
    }
}

#[async_trait]
impl WalletStore for SqlWalletStore {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        match self {
            Self::Sqlite(store) => store.get_by_id(id).await,
            Self::Postgres(store) => store.get_by_id(id).await,
        }
    }

    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.set_balance(id, balance).await,
            Self::Postgres(store) => store.set_balance(id, balance).await,
        }
    }
}
