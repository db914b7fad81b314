use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::domain::{Amount, Wallet, WalletId};

use super::{MIGRATION_001_WALLETS, StoreError, WalletStore, ensure_non_negative};

/// File-backed wallet store for local development and tests.
pub struct SqliteWalletStore {
    pool: SqlitePool,
}

impl SqliteWalletStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL. Waiting for a pooled connection is
    /// bounded by `acquire_timeout`.
    pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Open the database file at `path`, creating it if missing.
    pub async fn open(path: &str, acquire_timeout: Duration) -> Result<Self> {
        Self::connect(&format!("sqlite:{}?mode=rwc", path), acquire_timeout).await
    }

    /// Create the wallets table if it doesn't exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_WALLETS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Insert a wallet with an opening balance.
    pub async fn create_wallet(
        &self,
        id: WalletId,
        opening_balance: Amount,
    ) -> Result<Wallet, StoreError> {
        ensure_non_negative(id, opening_balance)?;

        let result = sqlx::query(
            r#"
            INSERT INTO wallets (valletid, amount)
            VALUES (?, ?)
            ON CONFLICT (valletid) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(opening_balance)
        .execute(&self.pool)
        .await
        .context("Failed to save wallet")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(id));
        }
        Ok(Wallet::new(id, opening_balance))
    }

    fn row_to_wallet(row: &SqliteRow) -> Result<Wallet> {
        Ok(Wallet {
            id: row.try_get("valletid").context("Invalid wallet id column")?,
            balance: row.try_get("amount").context("Invalid amount column")?,
        })
    }
}

#[async_trait]
impl WalletStore for SqliteWalletStore {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        let row = sqlx::query("SELECT valletid, amount FROM wallets WHERE valletid = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch wallet")?;

        match row {
            Some(row) => Ok(Self::row_to_wallet(&row)?),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError> {
        ensure_non_negative(id, balance)?;

        let result = sqlx::query("UPDATE wallets SET amount = ? WHERE valletid = ?")
            .bind(balance)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update wallet balance")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
