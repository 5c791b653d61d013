//! 活动列表筛选

use crate::api::models::EventSummary;

/// 按名称做大小写不敏感的子串匹配，保留原有顺序
///
/// 查询会先去掉首尾空白，空查询返回整个列表
pub fn filter_events<'a>(events: &'a [EventSummary], query: &str) -> Vec<&'a EventSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return events.iter().collect();
    }
    events
        .iter()
        .filter(|event| event.name.to_lowercase().contains(&needle))
        .collect()
}

/// 列表的三种互斥渲染状态
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    /// 数据尚未到达，由整页渲染占位
    Loading,
    /// 已加载但筛选后为空
    Empty { query: String },
    Populated(Vec<T>),
}

impl<T> ListState<T> {
    pub fn from_rows(rows: Vec<T>, query: &str) -> Self {
        if rows.is_empty() {
            ListState::Empty {
                query: query.trim().to_string(),
            }
        } else {
            ListState::Populated(rows)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListState::Empty { .. })
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ListState::Populated(rows) => rows,
            _ => &[],
        }
    }

    /// 空状态的说明文字
    pub fn empty_message(&self) -> String {
        match self {
            ListState::Empty { query } if !query.is_empty() => {
                format!("No events match \u{201c}{query}\u{201d}.")
            }
            ListState::Empty { .. } => "No events have been reported yet.".to_string(),
            _ => String::new(),
        }
    }
}
