//! AMM 兑换网关主程序

use amm_swap_gateway::chain::EthersChainClient;
use amm_swap_gateway::core::executor::{ExecutorConfig, SwapExecutor};
use amm_swap_gateway::server::{self, AppState};
use amm_swap_gateway::strategy::config::ConfigManager;
use eyre::Result;
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🚀 启动AMM兑换网关...");

    let config = match ConfigManager::load_from_env() {
        Ok(config) => {
            info!("✅ 配置加载成功");
            ConfigManager::print_config_summary(&config);
            config
        }
        Err(e) => {
            error!("❌ 配置加载失败: {}", e);
            return Err(e.into());
        }
    };

    let client = Arc::new(EthersChainClient::new(
        &config.network.rpc_url,
        config.pool.exchange_address,
        config.swap.wait_for_receipt,
    )?);
    info!("✅ 链上客户端创建成功，交易所合约: {:#x}", client.exchange_address());

    let executor = SwapExecutor::new(ExecutorConfig::from(&config), client.clone(), client);

    server::start_server(&config.server, AppState::new(executor)).await
}
