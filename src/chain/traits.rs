//! 链上读写trait定义

use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use eyre::Result;

use crate::core::types::{PoolReserves, SigningKey, TransactionEnvelope};

/// 链上只读接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// 读取池子当前储备
    async fn get_reserves(&self) -> Result<PoolReserves>;

    /// 读取账户的交易计数（包含待打包交易）
    async fn get_transaction_count(&self, address: Address) -> Result<U256>;
}

/// 链上写入接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// 签名交易，返回RLP编码的已签名交易
    async fn sign_transaction(&self, envelope: &TransactionEnvelope, key: &SigningKey) -> Result<Bytes>;

    /// 广播已签名交易，返回交易哈希
    async fn send_signed_transaction(&self, raw: Bytes) -> Result<H256>;
}
