//! 兑换执行器实现

use ethers::types::{Address, Bytes, U256};
use log::{debug, info, warn};
use std::sync::Arc;

use super::locks::SenderLocks;
use super::types::ExecutorConfig;
use crate::chain::{encode_swap_payload, ChainReader, ChainWriter};
use crate::core::types::{
    MinOutputBound, PipelineStep, PoolReserves, Result, SwapError, SwapExecutionRequest,
    SwapOutcome, SwapQuote, TransactionEnvelope,
};
use crate::strategy::amm::{self, SlippageTolerance};
use crate::utils::swap_deadline;

/// 兑换执行器
///
/// 每次调用都读取最新的储备和 nonce，不缓存任何链上状态，不自动重试
pub struct SwapExecutor {
    config: ExecutorConfig,
    reader: Arc<dyn ChainReader>,
    writer: Arc<dyn ChainWriter>,
    sender_locks: SenderLocks,
}

impl SwapExecutor {
    pub fn new(config: ExecutorConfig, reader: Arc<dyn ChainReader>, writer: Arc<dyn ChainWriter>) -> Self {
        Self {
            config,
            reader,
            writer,
            sender_locks: SenderLocks::new(),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// 读取池子当前储备
    pub async fn reserves(&self) -> Result<PoolReserves> {
        self.reader
            .get_reserves()
            .await
            .map_err(|e| SwapError::upstream_read(PipelineStep::FetchReserves, e))
    }

    /// 基于最新储备报价
    pub async fn quote(&self, amount_in: U256, slippage: SlippageTolerance) -> Result<SwapQuote> {
        let reserves = self.reserves().await?;
        let quote = amm::quote(amount_in, &reserves, slippage, self.config.rounding)?;

        debug!(
            "报价: amount_in={}, amount_out={}, min_amount_out={} (滑点 {})",
            amount_in, quote.amount_out, quote.min_amount_out, slippage
        );
        Ok(quote)
    }

    /// 执行一次兑换，成功返回交易哈希
    pub async fn execute(&self, request: SwapExecutionRequest) -> Result<SwapOutcome> {
        let SwapExecutionRequest {
            amount_in,
            bound,
            sender,
            signing_key,
        } = request;
        let request_id = short_request_id();

        if amount_in.is_zero() {
            return Err(SwapError::InvalidParameter("amountIn must be greater than zero".to_string()));
        }

        info!("[{}] 开始兑换: sender={:#x}, amount_in={}", request_id, sender, amount_in);

        // 1. 读取储备
        let reserves = self.reserves().await.map_err(|e| {
            warn!("[{}] 读取储备失败: {}", request_id, e);
            e
        })?;

        // 2. 确定最小输出量
        let min_amount_out = match bound {
            MinOutputBound::Known(min_amount_out) => {
                reserves.ensure_liquid()?;
                min_amount_out
            }
            MinOutputBound::Slippage(slippage) => {
                let quote = amm::quote(amount_in, &reserves, slippage, self.config.rounding)?;
                debug!(
                    "[{}] 报价: amount_out={}, min_amount_out={}",
                    request_id, quote.amount_out, quote.min_amount_out
                );
                quote.min_amount_out
            }
        };

        // 同一发送地址的 nonce 读取到广播必须串行
        let _sender_guard = self.sender_locks.acquire(sender).await;

        // 3. 构建调用数据
        let deadline = swap_deadline(self.config.deadline_secs);
        let data = encode_swap_payload(min_amount_out, deadline);

        // 4. 读取 nonce 并组装交易
        let nonce = self
            .reader
            .get_transaction_count(sender)
            .await
            .map_err(|e| SwapError::upstream_read(PipelineStep::FetchNonce, e))?;
        let envelope = self.build_envelope(sender, amount_in, nonce, data);

        info!(
            "[{}] 构建兑换交易: nonce={}, min_amount_out={}, deadline={}",
            request_id, nonce, min_amount_out, deadline
        );

        // 5. 签名，之后私钥不再保留
        let signed = self
            .writer
            .sign_transaction(&envelope, &signing_key)
            .await
            .map_err(|e| SwapError::Signing(format!("{:#}", e)));
        drop(signing_key);
        let signed = signed.map_err(|e| {
            warn!("[{}] 签名失败: {}", request_id, e);
            e
        })?;

        // 6. 广播
        let transaction_hash = self
            .writer
            .send_signed_transaction(signed)
            .await
            .map_err(|e| {
                let err = SwapError::upstream_write(PipelineStep::Submit, e);
                warn!("[{}] 广播失败: {}", request_id, err);
                err
            })?;

        info!("[{}] ✅ 兑换交易已广播: {:#x}", request_id, transaction_hash);

        Ok(SwapOutcome {
            transaction_hash,
            nonce,
            min_amount_out,
        })
    }

    fn build_envelope(&self, sender: Address, amount_in: U256, nonce: U256, data: Bytes) -> TransactionEnvelope {
        TransactionEnvelope {
            from: sender,
            to: self.config.pool_address,
            gas_limit: self.config.gas_limit,
            gas_price: self.config.gas_price,
            nonce,
            value: amount_in,
            data,
            chain_id: self.config.chain_id,
        }
    }
}

fn short_request_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
