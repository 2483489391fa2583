use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::strategy::amm::SlippageRounding;
use crate::utils::{is_valid_rpc_url, parse_address, redact_url};

/// 默认的交易所合约地址
pub const DEFAULT_POOL_ADDRESS: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";

const INFURA_MAINNET_URL: &str = "https://mainnet.infura.io/v3";

#[derive(Debug, thiserror::Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// 网络配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// RPC URL (可能包含项目凭证，不要直接打印)
    pub rpc_url: String,
    /// 签名使用的链ID (以太坊主网: 1)
    pub chain_id: u64,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 池子配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// 交易所合约地址
    pub exchange_address: Address,
}

/// 兑换交易参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// 每笔兑换的gas上限
    pub gas_limit: u64,
    /// gas价格 (gwei)
    pub gas_price_gwei: u64,
    /// 交易有效期 (秒)
    pub deadline_secs: u64,
    /// 滑点下限的取整规则
    pub slippage_rounding: SlippageRounding,
    /// 广播后是否等待收据
    pub wait_for_receipt: bool,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            gas_limit: 2_000_000,
            gas_price_gwei: 50,
            deadline_secs: 60,
            slippage_rounding: SlippageRounding::FloorSlippage,
            wait_for_receipt: false,
        }
    }
}

impl SwapConfig {
    pub fn gas_price_wei(&self) -> U256 {
        U256::from(self.gas_price_gwei) * U256::exp10(9)
    }
}

/// 完整的应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub server: ServerConfig,
    pub pool: PoolConfig,
    pub swap: SwapConfig,
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 从环境变量加载配置
    pub fn load_from_env() -> ConfigResult<AppConfig> {
        dotenv::dotenv().ok(); // 加载.env文件，如果存在的话
        Self::load_with(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn load_with<F>(lookup: F) -> ConfigResult<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // RPC_URL 优先，否则由 Infura 项目ID 拼接
        let rpc_url = match (var("RPC_URL"), var("INFURA_PROJECT_ID")) {
            (Some(url), _) => url,
            (None, Some(project_id)) => format!("{}/{}", INFURA_MAINNET_URL, project_id),
            (None, None) => {
                return Err(ConfigError(
                    "either RPC_URL or INFURA_PROJECT_ID must be set".to_string(),
                ))
            }
        };

        let network = NetworkConfig {
            rpc_url,
            chain_id: parse_or("CHAIN_ID", var("CHAIN_ID"), 1u64)?,
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", var("PORT"), defaults.port)?,
        };

        let pool_address = var("POOL_ADDRESS").unwrap_or_else(|| DEFAULT_POOL_ADDRESS.to_string());
        let pool = PoolConfig {
            exchange_address: parse_address(&pool_address)
                .ok_or_else(|| ConfigError("Invalid POOL_ADDRESS".to_string()))?,
        };

        let defaults = SwapConfig::default();
        let swap = SwapConfig {
            gas_limit: parse_or("GAS_LIMIT", var("GAS_LIMIT"), defaults.gas_limit)?,
            gas_price_gwei: parse_or("GAS_PRICE_GWEI", var("GAS_PRICE_GWEI"), defaults.gas_price_gwei)?,
            deadline_secs: parse_or("DEADLINE_SECS", var("DEADLINE_SECS"), defaults.deadline_secs)?,
            slippage_rounding: parse_or(
                "SLIPPAGE_ROUNDING",
                var("SLIPPAGE_ROUNDING"),
                defaults.slippage_rounding,
            )?,
            wait_for_receipt: parse_or("WAIT_FOR_RECEIPT", var("WAIT_FOR_RECEIPT"), defaults.wait_for_receipt)?,
        };

        let config = AppConfig {
            network,
            server,
            pool,
            swap,
        };

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// 验证配置的有效性
    fn validate_config(config: &AppConfig) -> ConfigResult<()> {
        if !is_valid_rpc_url(&config.network.rpc_url) {
            return Err(ConfigError("RPC URL must be an http(s) URL".to_string()));
        }

        if config.network.chain_id == 0 {
            return Err(ConfigError("CHAIN_ID cannot be 0".to_string()));
        }

        if config.pool.exchange_address == Address::zero() {
            return Err(ConfigError("POOL_ADDRESS cannot be the zero address".to_string()));
        }

        if config.swap.gas_limit == 0 {
            return Err(ConfigError("GAS_LIMIT must be positive".to_string()));
        }

        if config.swap.deadline_secs == 0 {
            return Err(ConfigError("DEADLINE_SECS must be positive".to_string()));
        }

        Ok(())
    }

    /// 打印配置摘要 (不包含敏感信息)
    pub fn print_config_summary(config: &AppConfig) {
        log::info!("=== 配置摘要 ===");
        log::info!("RPC: {} (链ID: {})", redact_url(&config.network.rpc_url), config.network.chain_id);
        log::info!("监听地址: {}", config.server.bind_address());
        log::info!("交易所合约: {:#x}", config.pool.exchange_address);
        log::info!("Gas上限: {}", config.swap.gas_limit);
        log::info!("Gas价格: {} gwei", config.swap.gas_price_gwei);
        log::info!("交易有效期: {} 秒", config.swap.deadline_secs);
        log::info!("滑点取整: {}", config.swap.slippage_rounding);
        log::info!("等待收据: {}", config.swap.wait_for_receipt);
        log::info!("==================");
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> ConfigResult<T> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError(format!("Invalid {}", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigManager::load_with(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_infura_project() {
        let config = load(&[("INFURA_PROJECT_ID", "abc123")]).unwrap();

        assert_eq!(config.network.rpc_url, "https://mainnet.infura.io/v3/abc123");
        assert_eq!(config.network.chain_id, 1);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
        assert_eq!(
            config.pool.exchange_address,
            parse_address(DEFAULT_POOL_ADDRESS).unwrap()
        );
        assert_eq!(config.swap.gas_limit, 2_000_000);
        assert_eq!(config.swap.gas_price_wei(), U256::from(50_000_000_000u64));
        assert_eq!(config.swap.deadline_secs, 60);
        assert_eq!(config.swap.slippage_rounding, SlippageRounding::FloorSlippage);
        assert!(!config.swap.wait_for_receipt);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("INFURA_PROJECT_ID", "ignored"),
            ("RPC_URL", "http://localhost:8545"),
            ("PORT", "8080"),
            ("CHAIN_ID", "5"),
            ("SLIPPAGE_ROUNDING", "result"),
            ("WAIT_FOR_RECEIPT", "true"),
        ])
        .unwrap();

        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.network.chain_id, 5);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.swap.slippage_rounding, SlippageRounding::FloorResult);
        assert!(config.swap.wait_for_receipt);
    }

    #[test]
    fn test_missing_rpc_is_error() {
        let err = load(&[("PORT", "5000")]).unwrap_err();
        assert!(err.to_string().contains("RPC_URL"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("INFURA_PROJECT_ID", "x"), ("PORT", "not-a-port")]).is_err());
        assert!(load(&[("INFURA_PROJECT_ID", "x"), ("POOL_ADDRESS", "0x1234")]).is_err());
        assert!(load(&[("INFURA_PROJECT_ID", "x"), ("SLIPPAGE_ROUNDING", "nearest")]).is_err());
        assert!(load(&[("RPC_URL", "wss://example.com")]).is_err());
        assert!(load(&[("INFURA_PROJECT_ID", "x"), ("GAS_LIMIT", "0")]).is_err());
    }
}
