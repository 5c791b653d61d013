//! 监控和运维功能模块
//!
//! 提供健康检查、Prometheus 指标暴露，以及 HTTP 请求和上游调用的指标收集

use axum::{
    extract::{MatchedPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics::{gauge, histogram, increment_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::time::Instant;

use crate::error::AppError;
use crate::state::AppState;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: u64,
    pub upstream: String,
}

/// 安装 Prometheus 指标收集器
///
/// 全局只能安装一次，返回的 handle 用于 /metrics 输出
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // 初始化HTTP请求指标
    increment_counter!("http_requests_total");
    gauge!("app_uptime_seconds", 0.0);

    Ok(handle)
}

/// 健康检查处理器
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    gauge!("app_uptime_seconds", state.uptime() as f64);

    // 检查上游 API 是否可达
    let upstream = match state.api.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("上游健康检查失败: {}", e);
            "unreachable"
        }
    };

    let response = HealthCheckResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.uptime(),
        upstream: upstream.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// 指标处理器 - 暴露Prometheus指标
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

/// 指标标签使用路由模板（如 `/app/events/:id`），未匹配的请求归为一类
pub fn route_label<B>(req: &axum::http::Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

/// 指标收集中间件
pub async fn metrics_middleware(
    req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Response {
    let start = Instant::now();
    let path = route_label(&req);
    let method = req.method().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status().as_u16().to_string();

    // 根据状态码分类记录请求
    if response.status().is_success() || response.status().is_redirection() {
        increment_counter!("http_requests_total", "status" => status.clone(), "method" => method.clone(), "path" => path.clone());
    } else {
        increment_counter!("http_requests_errors_total", "status" => status.clone(), "method" => method.clone(), "path" => path.clone());
    }

    histogram!("http_request_duration_seconds", duration.as_secs_f64(),
        "status" => status,
        "method" => method,
        "path" => path
    );

    response
}

/// 上游调用监控帮助函数
pub async fn track_upstream<T, F>(call: &'static str, f: F) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<T, AppError>>,
{
    increment_counter!("upstream_requests_total", "call" => call);
    let start = Instant::now();

    match f.await {
        Ok(result) => {
            histogram!("upstream_request_duration_seconds", start.elapsed().as_secs_f64(),
                "call" => call,
                "status" => "success"
            );
            Ok(result)
        }
        Err(e) => {
            increment_counter!("upstream_requests_errors_total", "call" => call);
            histogram!("upstream_request_duration_seconds", start.elapsed().as_secs_f64(),
                "call" => call,
                "status" => "error"
            );
            Err(e)
        }
    }
}
