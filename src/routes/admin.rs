//! 管理员会话的登录与退出
//!
//! 只负责把上游签发的令牌放进 HttpOnly cookie，不做任何权限判断

use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Form,
};
use serde::Deserialize;

use crate::session::AdminSession;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "modules/admin/sign_in.html")]
pub struct SignInTemplate {
    pub message: String,
}

/// 片段请求中的登录提示，状态码 200 以便 htmx 替换
#[derive(Template)]
#[template(path = "modules/admin/sign_in_prompt.html")]
pub struct SignInPromptTemplate {
    pub message: String,
}

pub const SESSION_REQUIRED: &str = "Admin reports need an admin session.";
pub const SESSION_EXPIRED: &str = "Your admin session has expired. Please sign in again.";

#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    token: String,
}

/// 渲染登录提示，受限内容不会先渲染再隐藏
pub fn sign_in_page(message: Option<&str>) -> Response {
    SignInTemplate {
        message: message.unwrap_or_default().to_string(),
    }
    .into_response()
}

pub fn sign_in_fragment(message: &str) -> Response {
    SignInPromptTemplate {
        message: message.to_string(),
    }
    .into_response()
}

pub async fn sign_in() -> Response {
    sign_in_page(None)
}

fn redirect_with_cookie(location: &'static str, cookie: Option<HeaderValue>) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, HeaderValue::from_static(location));
    if let Some(cookie) = cookie {
        headers.insert(header::SET_COOKIE, cookie);
    }
    response
}

/// 保存令牌后跳转到报表页
pub async fn create_session(State(state): State<AppState>, Form(form): Form<SignInForm>) -> Response {
    let Some(session) = AdminSession::new(form.token) else {
        let mut response = sign_in_page(Some("Please paste a valid admin token."));
        *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
        return response;
    };

    let cookie = session.cookie(
        &state.config.security.admin_cookie_name,
        state.config.is_production(),
    );
    tracing::info!("管理员会话已建立");
    redirect_with_cookie("/app/reports", cookie)
}

pub async fn clear_session(State(state): State<AppState>) -> Response {
    let cookie = AdminSession::clear_cookie(&state.config.security.admin_cookie_name);
    redirect_with_cookie("/app/admin", cookie)
}
