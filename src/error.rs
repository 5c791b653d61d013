//! 应用错误类型
//!
//! 所有处理器返回 `AppError`，转换为响应时附带 htmx 的 toast 触发头，
//! 页面只提示错误，不会整体失败。

use axum::{
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::helpers::security::sanitize_log_message;

/// 响应头名称，htmx 会据此在前端触发事件
pub const HX_TRIGGER: &str = "hx-trigger";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("上游请求失败: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("上游返回错误状态 {status}: {path}")]
    UpstreamStatus { status: u16, path: String },
    #[error("资源不存在")]
    NotFound,
    #[error("需要管理员会话")]
    Unauthorized,
    #[error("输入验证失败: {0}")]
    Validation(String),
    #[error("模板渲染失败: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) | AppError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 给用户看的提示文字
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream(_) | AppError::UpstreamStatus { .. } => {
                "The event service is unavailable right now. Please try again shortly.".to_string()
            }
            AppError::NotFound => "We couldn't find what you were looking for.".to_string(),
            AppError::Unauthorized => "Please sign in as an administrator.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Template(_) => "Something went wrong while rendering this page.".to_string(),
        }
    }
}

/// 构造 toast 触发头的值
pub fn toast_header(level: &str, message: &str) -> HeaderValue {
    let payload = json!({ "showToast": { "level": level, "message": message } }).to_string();
    HeaderValue::from_str(&payload).unwrap_or_else(|_| HeaderValue::from_static("showToast"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", sanitize_log_message(&self.to_string()));
        } else {
            tracing::warn!("{}", sanitize_log_message(&self.to_string()));
        }

        let message = self.user_message();
        let body = format!(
            "<div class=\"alert alert-error\" role=\"alert\">{}</div>",
            escape_html(&message)
        );

        let mut response = (status, Html(body)).into_response();
        response
            .headers_mut()
            .insert(HX_TRIGGER, toast_header("error", &message));
        response
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
