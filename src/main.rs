// ==========================================
// B2B 交易平台 - HTTP 服务主入口
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use b2b_marketplace::app::{configure_routes, AppState};
use b2b_marketplace::config::load_config;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    b2b_marketplace::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", b2b_marketplace::APP_NAME);
    tracing::info!("系统版本: {}", b2b_marketplace::VERSION);
    tracing::info!("==================================================");

    let config = load_config().context("配置加载失败")?;

    let state = AppState::new(&config).map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("AppState初始化成功");

    let app = configure_routes(Arc::new(state));

    let bind = config.server.bind.clone();
    let listener = match TcpListener::bind(&bind).await {
        Ok(listener) => {
            tracing::info!("服务已监听 http://{}", bind);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("端口已被占用: {}", bind);
            } else {
                tracing::error!("无法监听 {}: {}", bind, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;
    Ok(())
}
