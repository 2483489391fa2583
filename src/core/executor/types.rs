//! 执行器相关类型定义

use ethers::types::{Address, U256};

use crate::strategy::amm::SlippageRounding;
use crate::strategy::config::AppConfig;

/// 兑换执行器配置，启动时构建一次并显式传入
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    /// 交易所合约地址
    pub pool_address: Address,
    /// 签名使用的链ID
    pub chain_id: u64,
    /// gas上限
    pub gas_limit: U256,
    /// gas价格 (wei)
    pub gas_price: U256,
    /// 交易有效期 (秒)
    pub deadline_secs: u64,
    /// 滑点下限的取整规则
    pub rounding: SlippageRounding,
}

impl ExecutorConfig {
    /// 主网默认参数：2,000,000 gas，50 gwei，60 秒有效期
    pub fn new(pool_address: Address) -> Self {
        Self {
            pool_address,
            chain_id: 1,
            gas_limit: U256::from(2_000_000u64),
            gas_price: U256::from(50u64) * U256::exp10(9),
            deadline_secs: 60,
            rounding: SlippageRounding::default(),
        }
    }

    pub fn with_rounding(mut self, rounding: SlippageRounding) -> Self {
        self.rounding = rounding;
        self
    }
}

impl From<&AppConfig> for ExecutorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            pool_address: config.pool.exchange_address,
            chain_id: config.network.chain_id,
            gas_limit: U256::from(config.swap.gas_limit),
            gas_price: config.swap.gas_price_wei(),
            deadline_secs: config.swap.deadline_secs,
            rounding: config.swap.slippage_rounding,
        }
    }
}
