//! NGO 活动门户
//!
//! 服务端渲染的 htmx 界面：活动目录与报名、志愿者面板、排行榜，
//! 以及管理员的活动报表。所有数据来自外部 REST API。

pub mod api;
pub mod config;
pub mod error;
pub mod helpers;
pub mod reporting;
pub mod routes;
pub mod session;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;
