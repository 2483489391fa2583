//! API 路由

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;

use super::types::*;
use super::AppState;
use crate::utils::decorative_value;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// 创建路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reserves", get(get_reserves))
        .route("/api/value", get(get_value))
        .route("/calculate_min_amount_out", post(calculate_min_amount_out))
        .route("/swap", post(swap))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_reserves(State(state): State<AppState>) -> ApiResult<ReservesResponse> {
    let reserves = state.executor.reserves().await?;
    Ok(Json(reserves.into()))
}

async fn get_value() -> Json<ValueResponse> {
    Json(ValueResponse {
        value: decorative_value(),
    })
}

async fn calculate_min_amount_out(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MinAmountOutRequest>, JsonRejection>,
) -> ApiResult<MinAmountOutResponse> {
    let Json(request) = payload?;
    let (amount_in, slippage) = request.validate()?;

    let quote = state.executor.quote(amount_in, slippage).await?;

    Ok(Json(MinAmountOutResponse {
        min_amount_out: quote.min_amount_out.to_string(),
        amount_out: quote.amount_out.to_string(),
    }))
}

async fn swap(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SwapRequest>, JsonRejection>,
) -> ApiResult<SwapResponse> {
    let Json(request) = payload?;
    let request = request.into_execution_request()?;

    let outcome = state.executor.execute(request).await?;
    info!("兑换完成: tx_hash={:#x}, nonce={}", outcome.transaction_hash, outcome.nonce);

    Ok(Json(SwapResponse {
        tx_hash: format!("{:#x}", outcome.transaction_hash),
    }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
