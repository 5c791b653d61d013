//! 路由模块
//!
//! `/app` 开头返回完整页面，`/block` 开头返回 HTML 片段，
//! `/api` 开头执行操作后返回 HTML 片段

pub mod admin;
pub mod countdown;
pub mod events;
pub mod leaderboard;
pub mod official;
pub mod reports;
pub mod static_assets;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::helpers::monitoring::{health_check, metrics_handler, metrics_middleware};
use crate::state::AppState;

/// 组装全部路由和中间件
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();
    let security = &config.security;

    let origins: Vec<HeaderValue> = security
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 来源: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // 官网首页
        .route("/", get(official::index))
        // 完整页面
        .route("/app/events", get(events::events_page))
        .route("/app/events/:id", get(events::event_page))
        .route("/app/leaderboard", get(leaderboard::page))
        .route("/app/users/:id", get(users::dashboard))
        .route("/app/admin", get(admin::sign_in))
        .route("/app/admin/session", post(admin::create_session))
        .route("/app/admin/session/clear", post(admin::clear_session))
        .route("/app/reports", get(reports::dashboard))
        .route("/app/reports/events/by-name/:name", get(reports::event_report_page))
        // HTML 片段
        .route("/block/countdown", get(countdown::tick_fragment))
        .route("/block/events/:id/countdown/stream", get(countdown::stream))
        .route("/block/reports/events", get(reports::event_list))
        .route("/block/reports/events/:id", get(reports::event_detail))
        // 操作
        .route("/api/events/:id/register", post(events::register))
        .route("/api/users/:id/tasks", put(users::update_task))
        // 运维
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // 静态文件（嵌入式）
        .route("/static/*path", get(static_assets::static_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(cors),
        )
        // 表单等提取器的请求体上限
        .layer(DefaultBodyLimit::max(security.max_body_bytes))
        .with_state(state)
}
