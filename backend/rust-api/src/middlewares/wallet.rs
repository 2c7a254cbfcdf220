use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::services::identity::WalletIdentity;

pub const WALLET_HEADER: &str = "x-wallet-address";

/// Attaches the caller's wallet identity. Requests without a valid address
/// header still pass through, as a disconnected wallet.
pub async fn wallet_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let identity = match headers.get(WALLET_HEADER).and_then(|v| v.to_str().ok()) {
        Some(raw) => {
            let identity = WalletIdentity::from_address(raw);
            if identity == WalletIdentity::disconnected() {
                tracing::warn!("Ignoring malformed wallet address header");
            }
            identity
        }
        None => WalletIdentity::disconnected(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}
