use std::sync::Arc;

use tracing::error;

use crate::domain::{AmountInput, OperationKind, OperationRequest, RawOperation, Wallet, WalletId};
use crate::storage::WalletStore;

use super::{LedgerEngine, LedgerError};

/// Application service for wallet lookups and balance mutations.
/// This is the primary interface for any client (HTTP, CLI, ...).
pub struct WalletService {
    store: Arc<dyn WalletStore>,
    engine: LedgerEngine,
}

impl WalletService {
    /// Create a service whose engine writes through the same store it reads.
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self {
            engine: LedgerEngine::new(store.clone()),
            store,
        }
    }

    /// Get a wallet by id.
    pub async fn get_wallet(&self, id: WalletId) -> Result<Wallet, LedgerError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(LedgerError::from)
            .inspect_err(|err| report(id, err))
    }

    /// Apply a mutation described by client-supplied fields.
    pub async fn update_wallet(&self, raw: &RawOperation) -> Result<Wallet, LedgerError> {
        self.engine.apply_raw(raw).await.inspect_err(|err| {
            if let Some(id) = raw.wallet_id.as_ref().and_then(|v| v.as_i64()) {
                report(id, err);
            }
        })
    }

    pub async fn deposit(&self, id: WalletId, amount: AmountInput) -> Result<Wallet, LedgerError> {
        self.submit(id, OperationKind::Deposit, amount).await
    }

    pub async fn withdraw(&self, id: WalletId, amount: AmountInput) -> Result<Wallet, LedgerError> {
        self.submit(id, OperationKind::Withdraw, amount).await
    }

    async fn submit(
        &self,
        id: WalletId,
        kind: OperationKind,
        amount: AmountInput,
    ) -> Result<Wallet, LedgerError> {
        let request = OperationRequest::from_parts(id, kind, amount)?;
        self.engine
            .apply_operation(request)
            .await
            .inspect_err(|err| report(id, err))
    }
}

fn report(wallet_id: WalletId, err: &LedgerError) {
    if let LedgerError::StoreUnavailable(source) = err {
        error!(wallet_id, "Wallet store failure: {}", source);
    }
}
