use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;

use super::events::EventCard;
use crate::reporting::detail::event_start;
use crate::state::AppState;

/// 首页最多展示的即将开始的活动数
const FEATURED_LIMIT: usize = 3;

// 官网首页模板
#[derive(Template)]
#[template(path = "official/index.html")]
pub struct OfficialIndexTemplate {
    pub featured: Vec<EventCard>,
    pub event_count: usize,
}

/// 官网首页：展示最近的几场活动，上游不可用时只显示介绍内容
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let records = state.api.events().await.unwrap_or_else(|e| {
        tracing::warn!("首页获取活动失败: {}", e);
        Vec::new()
    });

    let now = chrono::Utc::now();
    let mut upcoming: Vec<_> = records
        .iter()
        .filter_map(|r| event_start(&r.date).filter(|start| *start > now).map(|start| (start, r)))
        .collect();
    upcoming.sort_by_key(|(start, _)| *start);

    OfficialIndexTemplate {
        featured: upcoming
            .into_iter()
            .take(FEATURED_LIMIT)
            .map(|(_, r)| EventCard::from_record(r))
            .collect(),
        event_count: records.len(),
    }
}
