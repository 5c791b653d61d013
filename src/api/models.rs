//! 上游 REST API 的数据结构
//!
//! 字段名与接口返回的 JSON 保持一致（camelCase），缺失字段使用默认值

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

lazy_static::lazy_static! {
    static ref PHONE_RE: regex::Regex =
        regex::Regex::new(r"^\+?[0-9][0-9\s\-()]{6,19}$").unwrap();
    static ref PARTICIPATION_RE: regex::Regex =
        regex::Regex::new(r"^(volunteer|participant)$").unwrap();
}

/// 把 JSON 数字或数字字符串读成有限浮点数，null 和其他类型为 0
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(numeric)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0))
}

/// 计数字段：负数、null 和非数字都记为 0
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(numeric)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as u64)
        .unwrap_or(0))
}

/// null 视为缺省值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 报表接口中的单个活动汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "image", deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub volunteer_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub participant_count: u64,
    #[serde(default, alias = "averageRating", deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default)]
    pub rating_distribution: Option<Map<String, Value>>,
}

/// 公开活动记录（GET /api/event）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub geographical_location: Option<Value>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub volunteers_assigned: Vec<Value>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    #[serde(default)]
    pub time: String,
    #[serde(default, alias = "activity")]
    pub title: String,
}

impl EventRecord {
    /// 平均评分，没有评价时为 0
    pub fn average_rating(&self) -> f64 {
        let rated: Vec<f64> = self
            .reviews
            .iter()
            .map(|r| r.rating)
            .filter(|r| r.is_finite())
            .collect();
        if rated.is_empty() {
            return 0.0;
        }
        rated.iter().sum::<f64>() / rated.len() as f64
    }

    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

/// 用户记录（GET /api/user/:id）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub events_subscribed: Vec<SubscribedEvent>,
    #[serde(default)]
    pub heatmap_activity: Vec<HeatmapDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedEvent {
    pub event_id: String,
    #[serde(default, alias = "eventName")]
    pub name: String,
    #[serde(default)]
    pub participation_type: String,
    #[serde(default)]
    pub tasks: Vec<AssignedTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    pub task_name: String,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// 下拉框的全部选项
    pub fn choices(&self) -> [TaskStatus; 3] {
        Self::ALL
    }

    pub fn matches(&self, other: &TaskStatus) -> bool {
        self == other
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapDay {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
}

/// 排行榜条目（GET /api/user/leaderboard）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub position: u32,
    pub name: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub rank: String,
}

/// PUT /api/user/update-task-status 请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdate {
    pub user_id: String,
    pub event_id: String,
    pub task_name: String,
    pub status: TaskStatus,
}

/// POST /api/user/registerVolunteerOrPart 请求体
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 1, max = 80, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(regex(path = "PHONE_RE", message = "Enter a valid phone number"))]
    pub phone: String,
    #[validate(regex(
        path = "PARTICIPATION_RE",
        message = "Choose volunteer or participant"
    ))]
    pub participation_type: String,
    #[validate(length(max = 1000, message = "Message is too long"))]
    pub message: String,
    #[validate(custom(function = "must_accept_terms"))]
    pub terms: bool,
    pub event_id: String,
}

fn must_accept_terms(terms: &bool) -> Result<(), validator::ValidationError> {
    if *terms {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("terms");
        error.message = Some("You must accept the terms".into());
        Err(error)
    }
}

/// 仪表盘概览（GET /api/reports/dashboard）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_events: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_volunteers: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_participants: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_rating: f64,
}

/// 最近动态（GET /api/reports/activities）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timestamp: String,
}

/// 志愿者概况（GET /api/reports/volunteer-overview）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerOverview {
    #[serde(default)]
    pub total_volunteers: u64,
    #[serde(default)]
    pub active_volunteers: u64,
    #[serde(default)]
    pub total_hours: u64,
    #[serde(default)]
    pub top_volunteers: Vec<TopVolunteer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopVolunteer {
    pub name: String,
    #[serde(default)]
    pub events_attended: u64,
    #[serde(default)]
    pub hours: u64,
}

/// 分类统计（GET /api/reports/categories）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}
