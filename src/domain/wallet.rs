use serde::{Deserialize, Serialize};

use super::Amount;

/// Wallets are addressed by a positive integer assigned out of band.
pub type WalletId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    /// Smallest currency unit. Never negative in any committed state.
    pub balance: Amount,
}

impl Wallet {
    pub fn new(id: WalletId, balance: Amount) -> Self {
        Self { id, balance }
    }

    pub fn with_balance(self, balance: Amount) -> Self {
        Self { balance, ..self }
    }

    pub fn can_cover(&self, amount: Amount) -> bool {
        self.balance >= amount
    }
}

/// Parse a wallet id as it appears in a URL path or on the command line.
/// Only strictly positive integers name a wallet.
pub fn parse_wallet_id(input: &str) -> Option<WalletId> {
    input.parse::<WalletId>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_balance_keeps_id() {
        let wallet = Wallet::new(7, 100).with_balance(40);
        assert_eq!(wallet, Wallet::new(7, 40));
    }

    #[test]
    fn test_can_cover() {
        let wallet = Wallet::new(1, 100);
        assert!(wallet.can_cover(100));
        assert!(wallet.can_cover(1));
        assert!(!wallet.can_cover(101));
    }

    #[test]
    fn test_parse_wallet_id() {
        assert_eq!(parse_wallet_id("1"), Some(1));
        assert_eq!(parse_wallet_id("42"), Some(42));
        assert_eq!(parse_wallet_id("0"), None);
        assert_eq!(parse_wallet_id("-3"), None);
        assert_eq!(parse_wallet_id("abc"), None);
        assert_eq!(parse_wallet_id("1.5"), None);
        assert_eq!(parse_wallet_id(""), None);
    }
}
