//! 请求/响应类型

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::core::types::{
    MinOutputBound, PoolReserves, Result, SigningKey, SwapError, SwapExecutionRequest,
};
use crate::strategy::amm::SlippageTolerance;
use crate::utils::{parse_address, parse_decimal_amount};

// =============================================================================
// Request Types
// =============================================================================

/// 数量参数：JSON 整数或十进制字符串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountParam {
    Integer(u64),
    Decimal(String),
}

impl AmountParam {
    pub fn parse(&self, field: &str) -> Result<U256> {
        match self {
            AmountParam::Integer(value) => Ok(U256::from(*value)),
            AmountParam::Decimal(text) => parse_decimal_amount(text).ok_or_else(|| {
                SwapError::InvalidParameter(format!(
                    "{} must be a non-negative integer amount",
                    field
                ))
            }),
        }
    }
}

/// 滑点参数：JSON 数字或数字字符串，单位为百分比
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlippageParam {
    Number(f64),
    Text(String),
}

impl SlippageParam {
    pub fn parse(&self) -> Result<SlippageTolerance> {
        let percent = match self {
            SlippageParam::Number(value) => *value,
            SlippageParam::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                SwapError::InvalidParameter("slippage must be a number of percent".to_string())
            })?,
        };
        SlippageTolerance::from_percent(percent)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinAmountOutRequest {
    pub amount_in: AmountParam,
    pub slippage: SlippageParam,
}

impl MinAmountOutRequest {
    pub fn validate(&self) -> Result<(U256, SlippageTolerance)> {
        let amount_in = self.amount_in.parse("amountIn")?;
        let slippage = self.slippage.parse()?;
        Ok((amount_in, slippage))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub amount_in: AmountParam,
    #[serde(default)]
    pub min_amount_out: Option<AmountParam>,
    #[serde(default)]
    pub slippage: Option<SlippageParam>,
    pub user_address: String,
    pub private_key: SigningKey,
}

impl SwapRequest {
    /// 校验并转换为执行请求，所有范围检查都在任何计算之前完成
    pub fn into_execution_request(self) -> Result<SwapExecutionRequest> {
        let amount_in = self.amount_in.parse("amountIn")?;

        let bound = match (&self.min_amount_out, &self.slippage) {
            (Some(min_amount_out), None) => MinOutputBound::Known(min_amount_out.parse("minAmountOut")?),
            (None, Some(slippage)) => MinOutputBound::Slippage(slippage.parse()?),
            (Some(_), Some(_)) => {
                return Err(SwapError::InvalidParameter(
                    "provide either minAmountOut or slippage, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(SwapError::InvalidParameter(
                    "one of minAmountOut or slippage is required".to_string(),
                ))
            }
        };

        let sender = parse_address(&self.user_address).ok_or_else(|| {
            SwapError::InvalidParameter("userAddress is not a valid 0x-prefixed address".to_string())
        })?;

        Ok(SwapExecutionRequest {
            amount_in,
            bound,
            sender,
            signing_key: self.private_key,
        })
    }
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservesResponse {
    pub token_reserve: String,
    pub eth_reserve: String,
}

impl From<PoolReserves> for ReservesResponse {
    fn from(reserves: PoolReserves) -> Self {
        Self {
            token_reserve: reserves.token_reserve().to_string(),
            eth_reserve: reserves.eth_reserve().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinAmountOutResponse {
    pub min_amount_out: String,
    pub amount_out: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub tx_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValueResponse {
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

// =============================================================================
// Errors
// =============================================================================

/// HTTP 层错误，统一映射为 500 + `{ error, kind }`
#[derive(Debug)]
pub struct ApiError(pub SwapError);

impl From<SwapError> for ApiError {
    fn from(err: SwapError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // 不回显请求体内容，其中可能包含私钥
        let reason = match rejection {
            JsonRejection::JsonDataError(_) => "missing or mistyped fields",
            JsonRejection::JsonSyntaxError(_) => "body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "expected Content-Type: application/json",
            _ => "unreadable request body",
        };
        ApiError(SwapError::InvalidParameter(format!("malformed request: {}", reason)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        log::warn!("请求失败 [{}]: {}", kind, self.0);

        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: kind.as_str().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
