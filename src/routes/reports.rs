//! 管理员报表路由
//!
//! 整页 `/app/reports` 先渲染加载占位，再由 htmx 拉取活动列表片段；
//! 列表片段负责筛选和分页，点击一行只发起一次详情请求。

use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::api::models::{Activity, CategoryCount, DashboardStats, EventSummary, VolunteerOverview};
use crate::error::{toast_header, AppError, HX_TRIGGER};
use crate::helpers::pagination::{paginate, PageQuery, Pagination};
use crate::reporting::detail::{format_event_date, EventDetailView};
use crate::reporting::fallback;
use crate::reporting::filter::{filter_events, ListState};
use crate::reporting::rating::percentage;
use crate::reporting::stats::ratio_label;
use crate::session::AdminSession;
use crate::state::AppState;

use super::admin::{sign_in_fragment, sign_in_page, SESSION_EXPIRED, SESSION_REQUIRED};

/// 列表中的一行
#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: String,
    pub name: String,
    pub date_label: String,
    pub participant_count: u64,
    pub volunteer_count: u64,
    pub ratio_label: String,
    pub rating_label: String,
}

impl EventRow {
    fn from_summary(summary: &EventSummary) -> Self {
        Self {
            id: summary.id.clone(),
            name: summary.name.clone(),
            date_label: format_event_date(&summary.date),
            participant_count: summary.participant_count,
            volunteer_count: summary.volunteer_count,
            ratio_label: ratio_label(summary.participant_count, summary.volunteer_count),
            rating_label: if summary.rating.is_finite() {
                format!("{:.1}", summary.rating)
            } else {
                "0.0".to_string()
            },
        }
    }
}

/// 分类占比
#[derive(Debug, Clone)]
pub struct CategoryShare {
    pub name: String,
    pub count: u64,
    pub percentage: String,
}

pub fn category_shares(categories: &[CategoryCount]) -> Vec<CategoryShare> {
    let total: u64 = categories.iter().map(|c| c.count).sum();
    categories
        .iter()
        .map(|c| CategoryShare {
            name: c.name.clone(),
            count: c.count,
            percentage: percentage(c.count, total),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "modules/reports/index.html")]
pub struct ReportsPageTemplate {
    pub stats: DashboardStats,
    pub activities: Vec<Activity>,
    pub overview: VolunteerOverview,
    pub categories: Vec<CategoryShare>,
    /// 整页渲染时列表总是处于加载状态
    pub list: ListState<EventRow>,
    pub query: String,
}

#[derive(Template)]
#[template(path = "modules/reports/event_list.html")]
pub struct EventListTemplate {
    pub list: ListState<EventRow>,
    pub query: String,
    pub pagination: Pagination,
}

#[derive(Template)]
#[template(path = "modules/reports/event_detail.html")]
pub struct EventDetailTemplate {
    pub detail: EventDetailView,
    /// 返回列表时恢复的筛选文字
    pub query: String,
}

/// 详情无法加载时的片段，保留返回按钮
#[derive(Template)]
#[template(path = "modules/reports/detail_unavailable.html")]
pub struct DetailUnavailableTemplate {
    pub message: String,
    pub query: String,
}

#[derive(Template)]
#[template(path = "modules/reports/event_page.html")]
pub struct EventReportPageTemplate {
    pub detail: EventDetailView,
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub q: String,
}

/// 单个区块的获取结果：失败时使用兜底数据并记录提示
async fn with_fallback<T>(
    section: &str,
    fut: impl std::future::Future<Output = Result<T, AppError>>,
    fallback: impl FnOnce() -> T,
    failures: &mut Vec<String>,
) -> Result<T, AppError> {
    match fut.await {
        Ok(value) => Ok(value),
        // 会话失效不能用兜底数据掩盖
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            tracing::warn!("获取{}失败，使用兜底数据: {}", section, e);
            failures.push(section.to_string());
            Ok(fallback())
        }
    }
}

/// 报表仪表盘整页
pub async fn dashboard(State(state): State<AppState>, session: Option<AdminSession>) -> Response {
    let Some(session) = session else {
        return sign_in_page(None);
    };

    match load_dashboard(&state, &session).await {
        Ok((template, failures)) => {
            let mut response = template.into_response();
            if !failures.is_empty() {
                let message = format!(
                    "Showing cached figures for: {}.",
                    failures.join(", ")
                );
                response
                    .headers_mut()
                    .insert(HX_TRIGGER, toast_header("warning", &message));
            }
            response
        }
        Err(AppError::Unauthorized) => sign_in_page(Some(SESSION_EXPIRED)),
        Err(e) => e.into_response(),
    }
}

async fn load_dashboard(
    state: &AppState,
    session: &AdminSession,
) -> Result<(ReportsPageTemplate, Vec<String>), AppError> {
    let mut failures = Vec::new();

    let stats = with_fallback(
        "dashboard stats",
        state.api.dashboard(session),
        fallback::dashboard_stats,
        &mut failures,
    )
    .await?;
    let activities = with_fallback(
        "recent activities",
        state.api.activities(session),
        fallback::activities,
        &mut failures,
    )
    .await?;
    let overview = with_fallback(
        "volunteer overview",
        state.api.volunteer_overview(session),
        fallback::volunteer_overview,
        &mut failures,
    )
    .await?;
    let categories = with_fallback(
        "categories",
        state.api.categories(session),
        Vec::new,
        &mut failures,
    )
    .await?;

    Ok((
        ReportsPageTemplate {
            stats,
            activities,
            overview,
            categories: category_shares(&categories),
            list: ListState::Loading,
            query: String::new(),
        },
        failures,
    ))
}

/// 活动列表片段：筛选 + 分页
///
/// 片段总是以 200 返回：上游失败时渲染空列表并附带提示，会话失效时渲染登录提示
pub async fn event_list(
    State(state): State<AppState>,
    session: Option<AdminSession>,
    Query(params): Query<ListQuery>,
) -> Response {
    let Some(session) = session else {
        return sign_in_fragment(SESSION_REQUIRED);
    };

    let (events, failure) = match state.api.event_reports(&session).await {
        Ok(events) => (events, None),
        Err(AppError::Unauthorized) => return sign_in_fragment(SESSION_EXPIRED),
        Err(e) => {
            tracing::warn!("获取活动报表失败，显示空列表: {}", e);
            (Vec::new(), Some(e.user_message()))
        }
    };

    let filtered = filter_events(&events, &params.q);
    let page_query = PageQuery {
        page: params.page,
        per_page: params.per_page,
    };
    let (page, pagination) = paginate(&filtered, &page_query);
    let rows = page.iter().map(|e| EventRow::from_summary(e)).collect();

    let mut response = EventListTemplate {
        list: ListState::from_rows(rows, &params.q),
        query: params.q.trim().to_string(),
        pagination,
    }
    .into_response();
    if let Some(message) = failure {
        response
            .headers_mut()
            .insert(HX_TRIGGER, toast_header("error", &message));
    }
    response
}

/// 活动详情片段，按 id 从报表列表中选取
pub async fn event_detail(
    State(state): State<AppState>,
    session: Option<AdminSession>,
    Path(id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Response {
    let Some(session) = session else {
        return sign_in_fragment(SESSION_REQUIRED);
    };
    let query = params.q.trim().to_string();

    let found = state
        .api
        .event_reports(&session)
        .await
        .and_then(|events| {
            events
                .into_iter()
                .find(|e| e.id == id)
                .ok_or(AppError::NotFound)
        });

    match found {
        Ok(summary) => EventDetailTemplate {
            detail: EventDetailView::from_summary(&summary),
            query,
        }
        .into_response(),
        Err(AppError::Unauthorized) => sign_in_fragment(SESSION_EXPIRED),
        Err(e) => {
            tracing::warn!("获取活动详情失败: id={}, {}", id, e);
            let message = e.user_message();
            let mut response = DetailUnavailableTemplate {
                message: message.clone(),
                query,
            }
            .into_response();
            response
                .headers_mut()
                .insert(HX_TRIGGER, toast_header("error", &message));
            response
        }
    }
}

/// 按活动名称查看报表详情（整页）
pub async fn event_report_page(
    State(state): State<AppState>,
    session: Option<AdminSession>,
    Path(name): Path<String>,
) -> Response {
    let Some(session) = session else {
        return sign_in_page(None);
    };

    match state.api.event_report_detail(&session, &name).await {
        Ok(summary) => EventReportPageTemplate {
            detail: EventDetailView::from_summary(&summary),
            query: String::new(),
        }
        .into_response(),
        Err(AppError::Unauthorized) => sign_in_page(Some(SESSION_EXPIRED)),
        Err(e) => e.into_response(),
    }
}
