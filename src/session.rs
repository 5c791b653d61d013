//! 管理员会话
//!
//! 会话只保存上游签发的令牌，并在每次报表请求时作为 Bearer 头转发。
//! 是否持有令牌仅用于决定渲染报表页还是登录提示，避免闪现受限内容；
//! 这不是安全边界，真正的授权由上游服务完成。

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, PartialEq, Eq)]
pub struct AdminSession {
    token: String,
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession").field("token", &"********").finish()
    }
}

impl AdminSession {
    /// 空白令牌视为没有会话
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() || !token.chars().all(is_cookie_safe) {
            return None;
        }
        Some(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// 写入会话的 Set-Cookie 值
    pub fn cookie(&self, name: &str, secure: bool) -> Option<HeaderValue> {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, self.token);
        if secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }

    /// 清除会话的 Set-Cookie 值
    pub fn clear_cookie(name: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            name
        ))
        .ok()
    }
}

fn is_cookie_safe(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\')
}

/// 从cookie字符串中提取指定cookie的值
pub fn extract_cookie_value(cookie_str: &str, cookie_name: &str) -> Option<String> {
    cookie_str.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.config.security.admin_cookie_name;
        parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find_map(|cookies| extract_cookie_value(cookies, cookie_name))
            .and_then(AdminSession::new)
            .ok_or(AppError::Unauthorized)
    }
}
