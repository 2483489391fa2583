use ethers::types::{Address, Bytes, TransactionRequest, H256, U256};
use ethers::types::transaction::eip2718::TypedTransaction;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::strategy::amm::SlippageTolerance;

/// 池子储备量（按 原生资产 -> 代币 的交换方向排列）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    /// 输入侧储备（原生资产，ETH）
    pub reserve_in: U256,
    /// 输出侧储备（代币）
    pub reserve_out: U256,
}

impl PoolReserves {
    pub fn new(reserve_in: U256, reserve_out: U256) -> Self {
        Self { reserve_in, reserve_out }
    }

    /// 从交易所合约 `getReserves()` 的返回值构建
    ///
    /// 合约返回 `reserve0` 为代币储备，`reserve1` 为 ETH 储备
    pub fn from_exchange(reserve0: U256, reserve1: U256) -> Self {
        Self {
            reserve_in: reserve1,
            reserve_out: reserve0,
        }
    }

    pub fn token_reserve(&self) -> U256 {
        self.reserve_out
    }

    pub fn eth_reserve(&self) -> U256 {
        self.reserve_in
    }

    /// 任一侧储备为零时池子无法定价
    pub fn ensure_liquid(&self) -> Result<()> {
        if self.reserve_in.is_zero() || self.reserve_out.is_zero() {
            return Err(SwapError::InvalidPoolState(format!(
                "pool has a zero reserve (in: {}, out: {})",
                self.reserve_in, self.reserve_out
            )));
        }
        Ok(())
    }
}

/// 报价结果，`min_amount_out <= amount_out`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub amount_out: U256,
    pub min_amount_out: U256,
}

/// 最小输出量的来源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinOutputBound {
    /// 调用方已经给出的下限，跳过定价
    Known(U256),
    /// 先报价，再按滑点计算下限
    Slippage(SlippageTolerance),
}

/// 调用方提供的私钥
///
/// 只在单次请求内存在，`Debug` 输出被屏蔽
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey(***)")
    }
}

/// 一次兑换执行请求
#[derive(Debug, Clone)]
pub struct SwapExecutionRequest {
    /// 随交易发送的原生资产数量 (wei)
    pub amount_in: U256,
    pub bound: MinOutputBound,
    pub sender: Address,
    pub signing_key: SigningKey,
}

/// 待签名的交易信封
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub from: Address,
    pub to: Address,
    pub gas_limit: U256,
    pub gas_price: U256,
    pub nonce: U256,
    pub value: U256,
    pub data: Bytes,
    pub chain_id: u64,
}

impl TransactionEnvelope {
    /// 转换为 legacy 交易
    pub fn to_typed_transaction(&self) -> TypedTransaction {
        TransactionRequest::new()
            .from(self.from)
            .to(self.to)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(self.nonce)
            .value(self.value)
            .data(self.data.clone())
            .chain_id(self.chain_id)
            .into()
    }
}

/// 兑换成功的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub transaction_hash: H256,
    pub nonce: U256,
    pub min_amount_out: U256,
}

/// 兑换流水线的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStep {
    FetchReserves,
    Price,
    BuildPayload,
    FetchNonce,
    Sign,
    Submit,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::FetchReserves => write!(f, "fetch reserves"),
            PipelineStep::Price => write!(f, "price"),
            PipelineStep::BuildPayload => write!(f, "build payload"),
            PipelineStep::FetchNonce => write!(f, "fetch nonce"),
            PipelineStep::Sign => write!(f, "sign"),
            PipelineStep::Submit => write!(f, "submit"),
        }
    }
}

/// 对外暴露的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    InvalidPoolState,
    UpstreamReadFailure,
    SigningFailure,
    UpstreamWriteFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "INVALID_PARAMETER",
            ErrorKind::InvalidPoolState => "INVALID_POOL_STATE",
            ErrorKind::UpstreamReadFailure => "UPSTREAM_READ_FAILURE",
            ErrorKind::SigningFailure => "SIGNING_FAILURE",
            ErrorKind::UpstreamWriteFailure => "UPSTREAM_WRITE_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid pool state: {0}")]
    InvalidPoolState(String),

    #[error("Upstream read failed during {step}: {message}")]
    UpstreamRead { step: PipelineStep, message: String },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Upstream write failed during {step}: {message}")]
    UpstreamWrite { step: PipelineStep, message: String },
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            SwapError::InvalidPoolState(_) => ErrorKind::InvalidPoolState,
            SwapError::UpstreamRead { .. } => ErrorKind::UpstreamReadFailure,
            SwapError::Signing(_) => ErrorKind::SigningFailure,
            SwapError::UpstreamWrite { .. } => ErrorKind::UpstreamWriteFailure,
        }
    }

    pub fn upstream_read(step: PipelineStep, err: eyre::Report) -> Self {
        SwapError::UpstreamRead {
            step,
            message: format!("{:#}", err),
        }
    }

    pub fn upstream_write(step: PipelineStep, err: eyre::Report) -> Self {
        SwapError::UpstreamWrite {
            step,
            message: format!("{:#}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::U64;

    #[test]
    fn test_reserves_orientation() {
        let reserves = PoolReserves::from_exchange(U256::from(500_000u64), U256::from(1_000_000u64));
        assert_eq!(reserves.reserve_in, U256::from(1_000_000u64));
        assert_eq!(reserves.token_reserve(), U256::from(500_000u64));
        assert_eq!(reserves.eth_reserve(), U256::from(1_000_000u64));
    }

    #[test]
    fn test_zero_reserve_is_invalid_pool_state() {
        let reserves = PoolReserves::new(U256::zero(), U256::from(10u64));
        let err = reserves.ensure_liquid().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPoolState);
        assert!(PoolReserves::new(U256::one(), U256::one()).ensure_liquid().is_ok());
    }

    #[test]
    fn test_signing_key_debug_is_redacted() {
        let key = SigningKey::new("0xdeadbeef");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("deadbeef"));
        assert_eq!(rendered, "SigningKey(***)");
    }

    #[test]
    fn test_envelope_to_legacy_transaction() {
        let envelope = TransactionEnvelope {
            from: Address::from_low_u64_be(1),
            to: Address::from_low_u64_be(2),
            gas_limit: U256::from(2_000_000u64),
            gas_price: U256::from(50_000_000_000u64),
            nonce: U256::from(3u64),
            value: U256::from(1_000u64),
            data: Bytes::from(vec![0xaa, 0xbb]),
            chain_id: 1,
        };

        let tx = envelope.to_typed_transaction();
        assert!(matches!(tx, TypedTransaction::Legacy(_)));
        assert_eq!(tx.from(), Some(&envelope.from));
        assert_eq!(tx.nonce(), Some(&envelope.nonce));
        assert_eq!(tx.value(), Some(&envelope.value));
        assert_eq!(tx.gas(), Some(&envelope.gas_limit));
        assert_eq!(tx.chain_id(), Some(U64::from(1u64)));
    }

    #[test]
    fn test_error_kind_codes() {
        let err = SwapError::upstream_read(PipelineStep::FetchReserves, eyre::eyre!("connection refused"));
        assert_eq!(err.kind().as_str(), "UPSTREAM_READ_FAILURE");
        assert!(err.to_string().contains("fetch reserves"));
        assert!(err.to_string().contains("connection refused"));
    }
}
