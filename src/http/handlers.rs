use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Amount, RawOperation, Wallet, WalletId, parse_wallet_id};

use super::{ApiError, AppState};

/// Wire shape of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    #[serde(rename = "valletId")]
    pub wallet_id: WalletId,
    pub amount: Amount,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_id: wallet.id,
            amount: wallet.balance,
        }
    }
}

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WalletResponse>, ApiError> {
    let id = parse_wallet_id(&id).ok_or_else(|| ApiError::BadRequest("Invalid ID".into()))?;

    let wallet = state
        .service
        .get_wallet(id)
        .await
        .map_err(ApiError::from_lookup)?;

    Ok(Json(wallet.into()))
}

/// The body is decoded by hand so that any malformed payload, whatever its
/// content type, is a plain 400.
pub async fn update_wallet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let raw = decode_operation(&body)?;

    state
        .service
        .update_wallet(&raw)
        .await
        .map_err(ApiError::from_update)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Only a JSON object is a request. The derived decoder would also take a
/// positional array, so the shape is checked on the parsed value first.
fn decode_operation(body: &[u8]) -> Result<RawOperation, ApiError> {
    let invalid =
        |e: serde_json::Error| ApiError::BadRequest(format!("Invalid request body: {}", e));

    let value: Value = serde_json::from_slice(body).map_err(invalid)?;
    if !value.is_object() {
        return Err(ApiError::BadRequest(
            "Invalid request body: expected a JSON object".into(),
        ));
    }
    serde_json::from_value(value).map_err(invalid)
}
