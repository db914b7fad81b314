use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{Amount, AmountError, AmountInput, WalletId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Deposit,
    Withdraw,
    /// Kept rather than rejected at parse time so that a missing wallet is
    /// reported before an unknown operation.
    Unrecognized(String),
}

impl OperationKind {
    /// Exact, case-sensitive match on the wire names.
    pub fn parse(s: &str) -> Self {
        match s {
            "DEPOSIT" => OperationKind::Deposit,
            "WITHDRAW" => OperationKind::Withdraw,
            other => OperationKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
            OperationKind::Unrecognized(s) => s,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request fields exactly as a client sent them. Absent and `null` are
/// indistinguishable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "valletId", alias = "walletId", default)]
    pub wallet_id: Option<Value>,
    #[serde(rename = "operationType", default)]
    pub operation_type: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl RawOperation {
    pub fn new(wallet_id: Value, operation_type: Value, amount: Value) -> Self {
        Self {
            wallet_id: Some(wallet_id),
            operation_type: Some(operation_type),
            amount: Some(amount),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    #[error("amount must be positive")]
    NonPositiveAmount(Amount),
}

/// A validated mutation intent. Consumed once by the ledger engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub wallet_id: WalletId,
    pub kind: OperationKind,
    pub amount: Amount,
}

impl OperationRequest {
    pub fn new(wallet_id: WalletId, kind: OperationKind, amount: Amount) -> Self {
        Self {
            wallet_id,
            kind,
            amount,
        }
    }

    /// Validate fields in order (wallet id, operation type, amount), then
    /// coerce and range-check the amount. The first failure wins.
    pub fn from_raw(raw: &RawOperation) -> Result<Self, ValidationError> {
        let wallet_id = raw
            .wallet_id
            .as_ref()
            .ok_or(ValidationError::MissingField("walletId"))
            .and_then(wallet_id_from_json)?;
        let operation_type = raw
            .operation_type
            .as_ref()
            .ok_or(ValidationError::MissingField("operationType"))?;
        let kind = match operation_type {
            Value::String(s) => OperationKind::parse(s),
            _ => {
                return Err(ValidationError::InvalidType {
                    field: "operationType",
                    expected: "a string",
                });
            }
        };
        let amount = raw
            .amount
            .as_ref()
            .ok_or(ValidationError::MissingField("amount"))?;

        let amount = AmountInput::from_json(amount)?.coerce()?;
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        Ok(Self::new(wallet_id, kind, amount))
    }

    /// Build a request from already-typed parts, applying the same amount
    /// rules as `from_raw`.
    pub fn from_parts(
        wallet_id: WalletId,
        kind: OperationKind,
        amount: AmountInput,
    ) -> Result<Self, ValidationError> {
        let amount = amount.coerce()?;
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        Ok(Self::new(wallet_id, kind, amount))
    }
}

fn wallet_id_from_json(value: &Value) -> Result<WalletId, ValidationError> {
    let invalid = ValidationError::InvalidType {
        field: "walletId",
        expected: "an integer",
    };
    let Value::Number(n) = value else {
        return Err(invalid);
    };
    if let Some(id) = n.as_i64() {
        return Ok(id);
    }
    match n.as_f64() {
        // Clients decoding into generic maps send integral ids as floats.
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as WalletId)
        }
        _ => Err(invalid),
    }
}
