use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::WalletId;

/// Registry of per-wallet async mutexes.
///
/// Holding a [`WalletGuard`] gives exclusive access to one wallet's
/// read-modify-write cycle; other wallets are unaffected. Entries are
/// removed once nobody holds or waits on them.
#[derive(Default)]
pub struct WalletLocks {
    locks: DashMap<WalletId, Arc<Mutex<()>>>,
}

pub struct WalletGuard<'a> {
    registry: &'a WalletLocks,
    wallet_id: WalletId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl WalletLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, wallet_id: WalletId) -> WalletGuard<'_> {
        // The shard lock is released at the end of this statement, before awaiting.
        let mutex = self.locks.entry(wallet_id).or_default().clone();
        let guard = mutex.lock_owned().await;
        WalletGuard {
            registry: self,
            wallet_id,
            guard: Some(guard),
        }
    }

    /// Number of wallets currently locked or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn release(&self, wallet_id: WalletId) {
        // Waiters hold their own clone, so a count of one means only the map
        // still references the mutex.
        self.locks
            .remove_if(&wallet_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl Drop for WalletGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.registry.release(self.wallet_id);
    }
}
