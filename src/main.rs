//! Wallet Ledger 主入口

use std::{future::IntoFuture, sync::Arc};

use anyhow::{anyhow, Result};
use tokio::{signal, sync::Notify};
use wallet_ledger::{api, app_state::AppState, config::Config, infrastructure::logging};

#[tokio::main]
async fn main() -> Result<()> {
    // ✅ 1. 加载环境变量
    dotenvy::dotenv().ok();

    // ✅ 2. 加载配置（CONFIG_PATH 指向的文件优先于环境变量）
    let config = Config::from_env_and_file(std::env::var("CONFIG_PATH").ok())?;
    config.validate()?;

    // ✅ 3. 初始化日志
    logging::init_logging(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        store = ?config.ledger.store,
        op_timeout_ms = config.ledger.op_timeout_ms,
        "🚀 Starting Wallet Ledger"
    );

    // ✅ 4. 存储与服务
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(config.clone()).await?);

    // ✅ 5. 启动服务器
    let app = api::routes(state.clone());
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("🎉 Server listening on http://{}", config.server.bind_addr);

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                shutdown_signal().await;
                shutdown.notify_one();
            }
        })
        .into_future();

    let drain_timeout = config.server.shutdown_timeout();
    tokio::select! {
        res = server => res?,
        _ = async {
            shutdown.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = drain_timeout.as_secs(),
                "⚠️ In-flight requests did not drain in time, forcing shutdown"
            );
        }
    }

    state.shutdown().await;
    tracing::info!("✅ Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Shutdown signal received");
}
