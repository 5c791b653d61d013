use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::{Path, State},
    Form,
};
use serde::Deserialize;

use crate::api::models::{AssignedTask, SubscribedEvent, TaskStatus, TaskStatusUpdate, UserRecord};
use crate::error::{toast_header, AppError, HX_TRIGGER};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "modules/users/index.html")]
pub struct UserDashboardTemplate {
    pub user: UserRecord,
    pub activity: ActivitySummary,
}

#[derive(Template)]
#[template(path = "modules/users/task_row.html")]
pub struct TaskRowTemplate {
    pub user_id: String,
    pub subscription: SubscribedEvent,
    pub task: AssignedTask,
}

/// 活跃度热力图的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySummary {
    pub active_days: usize,
    pub total_contributions: u64,
    pub busiest_day: Option<String>,
}

impl ActivitySummary {
    pub fn from_user(user: &UserRecord) -> Self {
        let active: Vec<_> = user.heatmap_activity.iter().filter(|d| d.count > 0).collect();
        // 数量相同时取较早的一天
        let busiest_day = active
            .iter()
            .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.date.cmp(&a.date)))
            .map(|d| d.date.clone());

        Self {
            active_days: active.len(),
            total_contributions: active.iter().map(|d| d.count).sum(),
            busiest_day,
        }
    }

    pub fn busiest_day_label(&self) -> &str {
        self.busiest_day.as_deref().unwrap_or("None yet")
    }
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdateForm {
    pub event_id: String,
    pub task_name: String,
    pub status: TaskStatus,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.api.user(&id).await?;
    let activity = ActivitySummary::from_user(&user);
    Ok(UserDashboardTemplate { user, activity })
}

/// 更新任务状态，成功后返回新的任务行
pub async fn update_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Form(form): Form<TaskUpdateForm>,
) -> Result<impl IntoResponse, AppError> {
    if form.task_name.trim().is_empty() {
        return Err(AppError::Validation("Task name is required".to_string()));
    }

    let update = TaskStatusUpdate {
        user_id: user_id.clone(),
        event_id: form.event_id.clone(),
        task_name: form.task_name.clone(),
        status: form.status,
    };
    state.api.update_task_status(&update).await?;
    tracing::info!("任务状态已更新: user={}, task={}, status={}", user_id, update.task_name, update.status.as_str());

    // 重新读取用户，任务行以上游为准
    let user = state.api.user(&user_id).await?;
    let subscription = user
        .events_subscribed
        .into_iter()
        .find(|s| s.event_id == form.event_id)
        .ok_or(AppError::NotFound)?;
    let task = subscription
        .tasks
        .iter()
        .find(|t| t.task_name == form.task_name)
        .cloned()
        .ok_or(AppError::NotFound)?;

    let mut response = TaskRowTemplate {
        user_id,
        subscription,
        task,
    }
    .into_response();
    response
        .headers_mut()
        .insert(HX_TRIGGER, toast_header("success", "Task updated."));
    Ok(response)
}
