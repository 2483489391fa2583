//! 基于 ethers 的链上客户端

use async_trait::async_trait;
use ethers::{
    prelude::*,
    types::{Address, BlockNumber, Bytes, H256, U256},
};
use eyre::{bail, eyre, Result, WrapErr};
use log::{debug, info};
use std::sync::Arc;

use super::contract::UniswapV1Exchange;
use super::traits::{ChainReader, ChainWriter};
use crate::core::types::{PoolReserves, SigningKey, TransactionEnvelope};
use crate::utils::scrub_url_secrets;

/// HTTP RPC 客户端，绑定到一个交易所合约
pub struct EthersChainClient {
    provider: Arc<Provider<Http>>,
    exchange: UniswapV1Exchange<Provider<Http>>,
    wait_for_receipt: bool,
    /// 用于从上游错误中去掉凭证
    rpc_url: String,
}

impl EthersChainClient {
    pub fn new(rpc_url: &str, exchange_address: Address, wait_for_receipt: bool) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .wrap_err("Failed to create RPC provider")?;
        let provider = Arc::new(provider);
        let exchange = UniswapV1Exchange::new(exchange_address, provider.clone());

        Ok(Self {
            provider,
            exchange,
            wait_for_receipt,
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn exchange_address(&self) -> Address {
        self.exchange.address()
    }

    /// 上游错误链中会带出请求URL，返回前先脱敏
    fn scrub(&self, err: eyre::Report) -> eyre::Report {
        eyre!(scrub_url_secrets(&format!("{:#}", err), &self.rpc_url))
    }
}

#[async_trait]
impl ChainReader for EthersChainClient {
    async fn get_reserves(&self) -> Result<PoolReserves> {
        let (reserve0, reserve1, block_timestamp_last) = self
            .exchange
            .get_reserves()
            .call()
            .await
            .wrap_err("getReserves call failed")
            .map_err(|e| self.scrub(e))?;

        debug!(
            "储备: token={}, eth={}, 最后更新={}",
            reserve0, reserve1, block_timestamp_last
        );

        Ok(PoolReserves::from_exchange(
            U256::from(reserve0),
            U256::from(reserve1),
        ))
    }

    async fn get_transaction_count(&self, address: Address) -> Result<U256> {
        self.provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .wrap_err("Failed to get nonce")
            .map_err(|e| self.scrub(e))
    }
}

#[async_trait]
impl ChainWriter for EthersChainClient {
    async fn sign_transaction(&self, envelope: &TransactionEnvelope, key: &SigningKey) -> Result<Bytes> {
        // 解析错误中不能带出私钥内容
        let wallet = key
            .expose()
            .parse::<LocalWallet>()
            .map_err(|_| eyre!("private key is not a valid secp256k1 key"))?
            .with_chain_id(envelope.chain_id);

        if wallet.address() != envelope.from {
            bail!(
                "private key does not control sender address {:#x}",
                envelope.from
            );
        }

        let tx = envelope.to_typed_transaction();
        let signature = wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| eyre!("Failed to sign transaction: {}", e))?;

        Ok(tx.rlp_signed(&signature))
    }

    async fn send_signed_transaction(&self, raw: Bytes) -> Result<H256> {
        let pending_tx = self
            .provider
            .send_raw_transaction(raw)
            .await
            .wrap_err("eth_sendRawTransaction rejected")
            .map_err(|e| self.scrub(e))?;
        let tx_hash = pending_tx.tx_hash();

        if !self.wait_for_receipt {
            return Ok(tx_hash);
        }

        info!("交易已发送，等待收据: {:#x}", tx_hash);
        let receipt = pending_tx
            .await
            .wrap_err("Failed to wait for receipt")
            .map_err(|e| self.scrub(e))?;

        match receipt {
            Some(receipt) => {
                info!(
                    "交易已确认: tx_hash={:#x}, status={:?}, gas_used={:?}",
                    receipt.transaction_hash, receipt.status, receipt.gas_used
                );
                Ok(receipt.transaction_hash)
            }
            None => bail!("transaction {:#x} was dropped from the mempool", tx_hash),
        }
    }
}
