use std::future::IntoFuture;
use std::time::Duration;

use ngo_event_portal::{
    api::ApiClient, config::AppConfig, helpers::monitoring::init_metrics, routes, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 配置加载失败时使用默认配置继续启动
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("警告: 无法加载配置: {}. 使用默认配置.", e);
        AppConfig::default()
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("❌ 服务异常退出: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("🔧 上游 API: {}", config.api.base_url);
    let api = ApiClient::new(&config.api)?;

    let addr = config.server.server_addr();
    let shutdown_timeout = Duration::from_secs(config.server.graceful_shutdown_timeout_seconds);

    let mut state = AppState::new(config, api);
    match init_metrics() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => tracing::warn!("指标收集器安装失败: {}", e),
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Portal listening on http://{}", listener.local_addr()?);

    // 关闭信号到达后开始计时，SSE 长连接不会无限期阻塞退出
    let (signal_tx, mut signal_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signal_tx.send(true);
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = signal_rx.wait_for(|fired| *fired).await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!("优雅关闭超时（{:?}），强制退出", shutdown_timeout);
        }
    }

    tracing::info!("👋 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = wait_or_park("Ctrl+C", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("无法监听 SIGTERM: {}", e);
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

    tracing::info!("收到关闭信号，开始优雅关闭");
}

/// 等待信号；监听失败时永不完成，避免误触发关闭
async fn wait_or_park<F>(name: &str, signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!("无法监听 {}: {}", name, e);
        std::future::pending::<()>().await;
    }
}
