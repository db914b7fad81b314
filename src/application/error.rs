use thiserror::Error;

use crate::domain::{Amount, BalanceError, ValidationError, WalletId};
use crate::storage::StoreError;

/// Coarse classification of ledger failures, used by callers to decide
/// how to report them and whether a retry could help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request or a business rule on the request itself.
    Input,
    /// The referenced wallet does not exist.
    State,
    /// A valid request blocked by the non-negative balance invariant.
    Business,
    /// Store connectivity or transport failure.
    Infrastructure,
    /// Stored data breaks a ledger invariant. Retrying cannot help.
    Integrity,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("unknown operationType. Must be DEPOSIT or WITHDRAW")]
    UnknownOperation(String),

    #[error("balance overflow")]
    BalanceOverflow {
        wallet_id: WalletId,
        balance: Amount,
        amount: Amount,
    },

    #[error("wallet not found")]
    WalletNotFound(WalletId),

    #[error("insufficient funds")]
    InsufficientFunds {
        wallet_id: WalletId,
        balance: Amount,
        required: Amount,
    },

    #[error("wallet already exists")]
    WalletExists(WalletId),

    #[error("wallet {wallet_id} holds a negative balance ({balance})")]
    InvariantViolation { wallet_id: WalletId, balance: Amount },

    #[error("store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Invalid(_)
            | LedgerError::UnknownOperation(_)
            | LedgerError::BalanceOverflow { .. } => ErrorKind::Input,
            LedgerError::WalletNotFound(_) | LedgerError::WalletExists(_) => ErrorKind::State,
            LedgerError::InsufficientFunds { .. } => ErrorKind::Business,
            LedgerError::InvariantViolation { .. } => ErrorKind::Integrity,
            LedgerError::StoreUnavailable(_) => ErrorKind::Infrastructure,
        }
    }

    /// Only infrastructure failures may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Infrastructure
    }

    pub(crate) fn from_balance(wallet_id: WalletId, err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds { balance, required } => {
                LedgerError::InsufficientFunds {
                    wallet_id,
                    balance,
                    required,
                }
            }
            BalanceError::Overflow { balance, amount } => LedgerError::BalanceOverflow {
                wallet_id,
                balance,
                amount,
            },
            BalanceError::UnknownOperation(name) => LedgerError::UnknownOperation(name),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LedgerError::WalletNotFound(id),
            StoreError::AlreadyExists(id) => LedgerError::WalletExists(id),
            StoreError::NegativeBalance { id, balance } => LedgerError::InvariantViolation {
                wallet_id: id,
                balance,
            },
            err @ StoreError::Unavailable(_) => LedgerError::StoreUnavailable(err),
        }
    }
}
