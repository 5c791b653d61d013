use askama::Template;
use askama_axum::IntoResponse;
use axum::{extract::State, response::Response};

use crate::api::models::LeaderboardEntry;
use crate::error::{toast_header, HX_TRIGGER};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "modules/leaderboard/index.html")]
pub struct LeaderboardTemplate {
    pub entries: Vec<LeaderboardEntry>,
    pub unavailable: bool,
}

/// 排行榜由上游计算，这里只按名次排序展示
pub async fn page(State(state): State<AppState>) -> Response {
    match state.api.leaderboard().await {
        Ok(mut entries) => {
            entries.sort_by_key(|e| e.position);
            LeaderboardTemplate {
                entries,
                unavailable: false,
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!("获取排行榜失败: {}", e);
            let mut response = LeaderboardTemplate {
                entries: vec![],
                unavailable: true,
            }
            .into_response();
            response
                .headers_mut()
                .insert(HX_TRIGGER, toast_header("error", &e.user_message()));
            response
        }
    }
}
