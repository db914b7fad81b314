use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{OperationRequest, RawOperation, Wallet, next_balance};
use crate::storage::WalletStore;

use super::{LedgerError, WalletLocks};

/// The only component that computes and writes wallet balances.
///
/// Each operation holds its wallet's lock from the balance read until the
/// write completes, so concurrent mutations of one wallet never act on a
/// stale balance. Failures are terminal; nothing is retried here.
pub struct LedgerEngine {
    store: Arc<dyn WalletStore>,
    locks: WalletLocks,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self {
            store,
            locks: WalletLocks::new(),
        }
    }

    /// Validate loosely-typed fields and apply the resulting operation.
    pub async fn apply_raw(&self, raw: &RawOperation) -> Result<Wallet, LedgerError> {
        let request = OperationRequest::from_raw(raw)?;
        self.apply_operation(request).await
    }

    /// Apply a validated operation and return the wallet as written.
    #[tracing::instrument(
        skip(self, request),
        fields(wallet_id = request.wallet_id, operation = %request.kind, amount = request.amount)
    )]
    pub async fn apply_operation(&self, request: OperationRequest) -> Result<Wallet, LedgerError> {
        let _guard = self.locks.lock(request.wallet_id).await;

        let wallet = self.store.get_by_id(request.wallet_id).await?;
        debug!(balance = wallet.balance, "Loaded wallet");
        if wallet.balance < 0 {
            error!(balance = wallet.balance, "Stored balance is negative");
            return Err(LedgerError::InvariantViolation {
                wallet_id: wallet.id,
                balance: wallet.balance,
            });
        }

        let balance = next_balance(wallet.balance, &request.kind, request.amount)
            .map_err(|err| LedgerError::from_balance(wallet.id, err))
            .inspect_err(|err| warn!(balance = wallet.balance, "Rejected operation: {}", err))?;

        self.store.set_balance(wallet.id, balance).await?;
        info!(balance, "Applied operation");

        Ok(wallet.with_balance(balance))
    }
}
