use serde_json::Value;
use thiserror::Error;

/// Balances and operation amounts are integers in the smallest currency unit.
pub type Amount = i64;

/// The representations an inbound amount may arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Integer(i64),
    /// Truncated toward zero during coercion.
    Float(f64),
    /// Parsed as a base-10 integer during coercion.
    Text(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must be a number")]
    NotANumber,

    #[error("amount must be a valid number")]
    Unparsable(String),

    #[error("amount is out of range")]
    OutOfRange,
}

impl AmountInput {
    /// Classify a JSON value. Booleans, arrays and objects are never amounts.
    pub fn from_json(value: &Value) -> Result<Self, AmountError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(AmountInput::Integer(i))
                } else if n.is_u64() {
                    Err(AmountError::OutOfRange)
                } else {
                    n.as_f64()
                        .map(AmountInput::Float)
                        .ok_or(AmountError::NotANumber)
                }
            }
            Value::String(s) => Ok(AmountInput::Text(s.clone())),
            _ => Err(AmountError::NotANumber),
        }
    }

    /// Reduce the input to an integer amount. Sign is preserved; the
    /// positivity check belongs to the caller.
    pub fn coerce(&self) -> Result<Amount, AmountError> {
        match self {
            AmountInput::Integer(i) => Ok(*i),
            AmountInput::Float(f) => truncate_float(*f),
            AmountInput::Text(s) => s
                .parse::<Amount>()
                .map_err(|_| AmountError::Unparsable(s.clone())),
        }
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Integer(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Float(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

fn truncate_float(value: f64) -> Result<Amount, AmountError> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !value.is_finite() || value >= i64::MAX as f64 || value < i64::MIN as f64 {
        return Err(AmountError::OutOfRange);
    }
    Ok(value.trunc() as Amount)
}
