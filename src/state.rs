//! 共享应用状态

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

use crate::api::ApiClient;
use crate::config::AppConfig;

/// 应用状态，包含启动时间、配置和上游客户端
#[derive(Clone)]
pub struct AppState {
    pub start_time: Instant,
    pub config: Arc<AppConfig>,
    pub api: ApiClient,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, api: ApiClient) -> Self {
        Self {
            start_time: Instant::now(),
            config: Arc::new(config),
            api,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// 获取应用运行时间（秒）
    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
