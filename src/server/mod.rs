//! Axum HTTP 服务
//!
//! 路由只做请求解析和错误映射，业务逻辑全部在 `SwapExecutor`

pub mod routes;
pub mod types;

use axum::Router;
use eyre::{Result, WrapErr};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::executor::SwapExecutor;
use crate::strategy::config::ServerConfig;

pub use routes::*;
pub use types::*;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<SwapExecutor>,
}

impl AppState {
    pub fn new(executor: SwapExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }
}

/// 构建应用路由与中间件
pub fn build_app(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 启动服务，直到收到 Ctrl+C
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {}", addr))?;

    info!("✅ 服务监听于 http://{}", addr);

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    info!("🏁 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("无法监听关闭信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号，正在停止服务...");
}
