//! 倒计时片段
//!
//! 两种刷新方式：列表卡片用 htmx 每秒轮询 `/block/countdown`，
//! 活动详情页通过 SSE 订阅一个随连接存活的 `CountdownTask`。

use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::stream::{self, Stream};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;

use crate::error::AppError;
use crate::reporting::countdown::{tick, CountdownState, CountdownTask};
use crate::reporting::detail::event_start;
use crate::state::AppState;

/// SSE 事件名：计时中与已开始
pub const TICK_EVENT: &str = "countdown";
pub const FINISHED_EVENT: &str = "finished";
pub const FINISHED_LABEL: &str = "This event has started";

/// 结束事件里的重连间隔，EventSource 在流关闭后不会马上重连
const FINISHED_RETRY: Duration = Duration::from_secs(24 * 60 * 60);

/// 倒计时的展示数据
#[derive(Debug, Clone)]
pub struct CountdownView {
    /// RFC 3339 目标时间，作为轮询参数
    pub target: String,
    pub state: CountdownState,
}

impl CountdownView {
    pub fn new(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            target: target.to_rfc3339_opts(SecondsFormat::Secs, true),
            state: tick(target, now),
        }
    }

    /// 从活动日期构建，日期无法解析时没有倒计时
    pub fn for_event_date(raw: &str) -> Option<Self> {
        event_start(raw).map(|target| Self::new(target, Utc::now()))
    }

    pub fn finished(&self) -> bool {
        self.state.is_finished()
    }
}

#[derive(Template)]
#[template(path = "modules/countdown/tick.html")]
pub struct CountdownTickTemplate {
    pub countdown: CountdownView,
}

#[derive(Deserialize)]
pub struct CountdownQuery {
    target: String,
}

/// 轮询片段：每次请求按当前时间重算；结束后返回的片段不再带轮询触发器
pub async fn tick_fragment(Query(query): Query<CountdownQuery>) -> Result<impl IntoResponse, AppError> {
    let target = DateTime::parse_from_rfc3339(query.target.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation("Invalid countdown target".to_string()))?;

    Ok(CountdownTickTemplate {
        countdown: CountdownView::new(target, Utc::now()),
    })
}

/// SSE 推送：任务随响应流存在，客户端断开时流被释放，任务随之取消
pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let event = state.api.event(&id).await?;
    let target = event_start(&event.date).ok_or(AppError::NotFound)?;

    tracing::debug!("开始推送倒计时: event={}, target={}", id, target);
    Ok(Sse::new(countdown_events(CountdownTask::spawn(target))).keep_alive(KeepAlive::default()))
}

/// 把倒计时任务转换为 SSE 事件流，到达 0 后发送 `finished` 事件并结束
pub fn countdown_events(task: CountdownTask) -> impl Stream<Item = Result<Event, Infallible>> {
    let rx = task.subscribe();
    stream::unfold(Some((task, rx, true)), |state| async move {
        let (task, mut rx, first) = state?;
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let current = *rx.borrow_and_update();
        if current.is_finished() {
            return Some((Ok(finished_event()), None));
        }
        let event = Event::default().event(TICK_EVENT).data(current.label());
        Some((Ok(event), Some((task, rx, false))))
    })
}

fn finished_event() -> Event {
    Event::default()
        .event(FINISHED_EVENT)
        .data(FINISHED_LABEL)
        .retry(FINISHED_RETRY)
}
