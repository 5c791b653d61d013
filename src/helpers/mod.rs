//! 通用辅助模块

pub mod monitoring;
pub mod pagination;
pub mod security;
