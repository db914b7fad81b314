use thiserror::Error;

use super::{Amount, OperationKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("insufficient funds")]
    InsufficientFunds { balance: Amount, required: Amount },

    #[error("balance overflow")]
    Overflow { balance: Amount, amount: Amount },

    #[error("unknown operationType. Must be DEPOSIT or WITHDRAW")]
    UnknownOperation(String),
}

/// Compute the balance that results from applying `kind` with `amount` to
/// `balance`. Never returns a negative balance when `balance` is
/// non-negative and `amount` is positive.
pub fn next_balance(
    balance: Amount,
    kind: &OperationKind,
    amount: Amount,
) -> Result<Amount, BalanceError> {
    match kind {
        OperationKind::Deposit => balance
            .checked_add(amount)
            .ok_or(BalanceError::Overflow { balance, amount }),
        OperationKind::Withdraw => {
            if balance < amount {
                return Err(BalanceError::InsufficientFunds {
                    balance,
                    required: amount,
                });
            }
            Ok(balance - amount)
        }
        OperationKind::Unrecognized(name) => Err(BalanceError::UnknownOperation(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_adds() {
        assert_eq!(next_balance(500, &OperationKind::Deposit, 100), Ok(600));
        assert_eq!(next_balance(0, &OperationKind::Deposit, 1), Ok(1));
    }

    #[test]
    fn test_withdraw_subtracts() {
        assert_eq!(next_balance(100, &OperationKind::Withdraw, 60), Ok(40));
        assert_eq!(next_balance(100, &OperationKind::Withdraw, 100), Ok(0));
    }

    #[test]
    fn test_withdraw_more_than_balance() {
        assert_eq!(
            next_balance(600, &OperationKind::Withdraw, 1000),
            Err(BalanceError::InsufficientFunds {
                balance: 600,
                required: 1000
            })
        );
    }

    #[test]
    fn test_deposit_overflow() {
        assert!(matches!(
            next_balance(i64::MAX, &OperationKind::Deposit, 1),
            Err(BalanceError::Overflow { .. })
        ));
    }

    #[test]
    fn test_unknown_operation() {
        let err = next_balance(100, &OperationKind::Unrecognized("TRANSFER".into()), 10)
            .unwrap_err();
        assert_eq!(err, BalanceError::UnknownOperation("TRANSFER".into()));
        assert_eq!(
            err.to_string(),
            "unknown operationType. Must be DEPOSIT or WITHDRAW"
        );
    }

    #[test]
    fn test_sequences_never_go_negative() {
        let ops = [
            (OperationKind::Deposit, 50),
            (OperationKind::Withdraw, 30),
            (OperationKind::Withdraw, 30),
            (OperationKind::Withdraw, 20),
            (OperationKind::Deposit, 5),
            (OperationKind::Withdraw, 6),
        ];

        let mut balance = 0;
        for (kind, amount) in ops.iter() {
            if let Ok(next) = next_balance(balance, kind, *amount) {
                balance = next;
            }
            assert!(balance >= 0, "balance went negative: {}", balance);
        }
        assert_eq!(balance, 5);
    }
}
