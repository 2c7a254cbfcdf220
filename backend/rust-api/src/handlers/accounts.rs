use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::{
    models::account::Account,
    services::{
        identity::{IdentityProvider, WalletIdentity},
        AppState,
    },
};

/// GET /api/v1/accounts/{address}
///
/// Wallets that never finished a game report a fresh level 1 account.
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = WalletIdentity::from_address(&address);
    let address = identity
        .address()
        .ok_or_else(|| ApiError::bad_request(format!("Invalid wallet address: {}", address)))?;

    let account = state
        .ledger
        .get(address)
        .unwrap_or_else(|| Account::new(address));
    Ok(Json(account))
}
