//! 应用配置管理模块
//!
//! 统一管理应用的所有配置，支持从配置文件和环境变量加载。
//! 配置在启动时加载一次，通过 `AppState` 注入到各个处理器。

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Error as FigmentError, Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 配置加载错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置加载错误: {0}")]
    Loading(#[from] FigmentError),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 服务器配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            graceful_shutdown_timeout_seconds: 5,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 上游 REST API 配置
///
/// 所有请求共用同一个 base_url，不在调用处拼接主机和端口
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 10,
            user_agent: format!("ngo-event-portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// 安全配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SecurityConfig {
    pub cors_allow_origins: Vec<String>,
    /// 保存管理员令牌的 cookie 名称
    pub admin_cookie_name: String,
    pub max_body_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_allow_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            admin_cookie_name: "admin_session".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// 应用配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub log_level: String,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            security: SecurityConfig::default(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// 从默认位置加载配置
    pub fn load() -> Result<Self, ConfigError> {
        // 配置文件搜索路径
        let config_paths = [
            PathBuf::from("./config.toml"),
            PathBuf::from("../config.toml"),
            PathBuf::from("./config/config.toml"),
        ];

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for path in config_paths {
            if path.exists() {
                tracing::info!("从配置文件加载: {}", path.display());
                figment = figment.merge(Toml::file(path));
                break; // 只加载第一个存在的配置文件
            }
        }

        // 环境变量优先级最高，例如 APP_API__BASE_URL
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Self::from_figment(figment)
    }

    /// 从给定的 figment 提取并验证配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(
            self.environment.to_lowercase().as_str(),
            "development" | "staging" | "production"
        ) {
            return Err(ConfigError::Validation(
                "环境必须是 development、staging 或 production".to_string(),
            ));
        }

        if !matches!(
            self.log_level.to_lowercase().as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            return Err(ConfigError::Validation(
                "日志级别必须是 error、warn、info、debug 或 trace".to_string(),
            ));
        }

        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url 必须以 http:// 或 https:// 开头: {:?}",
                self.api.base_url
            )));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_seconds 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 默认的 tracing 过滤规则
    pub fn default_log_filter(&self) -> String {
        let level = self.log_level.to_lowercase();
        format!("ngo_event_portal={level},tower_http={level},reqwest=info")
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
