// handler/wallet.rs
use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::{
    db::walletdb::WalletExt,
    dtos::ApiResponse,
    error::HttpError,
    middleware::JWTAuthMiddleware,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct TransactionHistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn wallet_handler() -> Router {
    Router::new().route("/", get(get_wallet))
}

pub async fn get_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddleware>,
    Query(query): Query<TransactionHistoryQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let balance = app_state.wallet_service.balance(auth.user.id).await?;

    let transactions = app_state
        .db_client
        .get_wallet_transactions(auth.user.id, limit, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Wallet retrieved",
        serde_json::json!({
            "balance": balance,
            "transactions": transactions,
        }),
    )))
}
