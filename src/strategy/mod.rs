//! 定价策略与运行配置

pub mod amm;
pub mod config;

pub use amm::{
    calculate_min_amount_out, get_output_amount, quote, SlippageRounding, SlippageTolerance,
};
pub use config::{AppConfig, ConfigError, ConfigManager, NetworkConfig, PoolConfig, ServerConfig, SwapConfig};
