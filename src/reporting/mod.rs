//! 报表与统计
//!
//! 纯计算模块：评分分布、比例指标、列表筛选、详情视图模型和倒计时

pub mod countdown;
pub mod detail;
pub mod fallback;
pub mod filter;
pub mod rating;
pub mod stats;
