use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};

use crate::config::DatabaseConfig;
use crate::domain::{Amount, Wallet, WalletId};

use super::{MIGRATION_001_WALLETS, StoreError, WalletStore, ensure_non_negative};

// The wallets table is owned outside this crate and may declare its columns
// as INTEGER; casting keeps decoding independent of the column width.
const SELECT_WALLET: &str = "SELECT valletid::BIGINT AS valletid, amount::BIGINT AS amount \
     FROM wallets WHERE valletid = $1";
const UPDATE_BALANCE: &str = "UPDATE wallets SET amount = $1 WHERE valletid = $2";

/// PostgreSQL-backed wallet store. The pool is shared by every request.
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using discrete connection parameters. The initial connect
    /// doubles as a connectivity check and is bounded by the acquire timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name)
            .ssl_mode(PgSslMode::Disable);

        Self::connect_with(options, config.acquire_timeout).await
    }

    pub async fn connect_with(
        options: PgConnectOptions,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_WALLETS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    pub async fn create_wallet(
        &self,
        id: WalletId,
        opening_balance: Amount,
    ) -> Result<Wallet, StoreError> {
        ensure_non_negative(id, opening_balance)?;

        let result = sqlx::query(
            r#"
            INSERT INTO wallets (valletid, amount)
            VALUES ($1, $2)
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

    fn row_to_wallet(row: &PgRow) -> Result<Wallet> {
        Ok(Wallet {
            id: row.try_get("valletid").context("Invalid wallet id column")?,
            balance: row.try_get("amount").context("Invalid amount column")?,
        })
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError> {
        let row = sqlx::query(SELECT_WALLET)
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

        let result = sqlx::query(UPDATE_BALANCE)
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
