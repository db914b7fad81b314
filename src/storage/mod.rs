mod backend;
mod memory;
mod postgres;
mod sqlite;

pub use backend::*;
pub use memory::*;
pub use postgres::*;
pub use sqlite::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Amount, Wallet, WalletId};

/// SQL schema for the wallets table. Only applied by explicit `init`; the
/// server expects the table to exist.
pub const MIGRATION_001_WALLETS: &str = include_str!("migrations/001_wallets.sql");

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("wallet not found")]
    NotFound(WalletId),

    #[error("wallet already exists: {0}")]
    AlreadyExists(WalletId),

    #[error("refusing to store negative balance {balance} for wallet {id}")]
    NegativeBalance { id: WalletId, balance: Amount },

    #[error("store unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),
}

/// Durable mapping from wallet id to balance.
///
/// Every read is authoritative at call time; implementations must not
/// cache balances. A failed `set_balance` leaves the stored value untouched.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn get_by_id(&self, id: WalletId) -> Result<Wallet, StoreError>;

    /// Overwrite the stored balance. Persisted before returning.
    async fn set_balance(&self, id: WalletId, balance: Amount) -> Result<(), StoreError>;
}

fn ensure_non_negative(id: WalletId, balance: Amount) -> Result<(), StoreError> {
    if balance < 0 {
        return Err(StoreError::NegativeBalance { id, balance });
    }
    Ok(())
}
