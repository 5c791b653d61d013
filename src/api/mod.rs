//! 上游 REST API 客户端
//!
//! 所有请求都基于配置中的同一个 base_url。管理员令牌只作为 Bearer 头转发，
//! 真正的权限判断由上游完成。

pub mod models;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::helpers::monitoring::track_upstream;
use crate::session::AdminSession;
use models::{
    Activity, CategoryCount, DashboardStats, EventRecord, EventSummary, LeaderboardEntry,
    Registration, TaskStatusUpdate, UserRecord, VolunteerOverview,
};

/// REST API 客户端，内部的 reqwest::Client 可廉价克隆
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, session: Option<&AdminSession>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, AppError> {
        let response = builder.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => Err(AppError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized),
            status => Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                path: path.to_string(),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: Option<&AdminSession>,
    ) -> Result<T, AppError> {
        tracing::debug!("GET {}", path);
        self.send_json(self.request(Method::GET, path, session), path)
            .await
    }

    async fn send_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        tracing::debug!("{} {}", method, path);
        self.send_json(self.request(method, path, None).json(body), path)
            .await
    }

    /// 检查上游是否可达
    pub async fn ping(&self) -> Result<(), AppError> {
        let path = "/api/event";
        let response = self.request(Method::GET, path, None).send().await?;
        if response.status().is_server_error() {
            return Err(AppError::UpstreamStatus {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }
        Ok(())
    }

    // ---- 公开活动 ----

    pub async fn events(&self) -> Result<Vec<EventRecord>, AppError> {
        track_upstream("events", self.get("/api/event", None)).await
    }

    pub async fn event(&self, id: &str) -> Result<EventRecord, AppError> {
        let path = format!("/api/event/{}", encode_segment(id));
        track_upstream("event", self.get(&path, None)).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<serde_json::Value, AppError> {
        track_upstream(
            "register",
            self.send_body(Method::POST, "/api/user/registerVolunteerOrPart", registration),
        )
        .await
    }

    // ---- 用户 ----

    pub async fn user(&self, id: &str) -> Result<UserRecord, AppError> {
        let path = format!("/api/user/{}", encode_segment(id));
        track_upstream("user", self.get(&path, None)).await
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        track_upstream("leaderboard", self.get("/api/user/leaderboard", None)).await
    }

    pub async fn update_task_status(
        &self,
        update: &TaskStatusUpdate,
    ) -> Result<serde_json::Value, AppError> {
        track_upstream(
            "update_task_status",
            self.send_body(Method::PUT, "/api/user/update-task-status", update),
        )
        .await
    }

    // ---- 报表（需要管理员会话） ----

    pub async fn dashboard(&self, session: &AdminSession) -> Result<DashboardStats, AppError> {
        track_upstream("dashboard", self.get("/api/reports/dashboard", Some(session))).await
    }

    pub async fn activities(&self, session: &AdminSession) -> Result<Vec<Activity>, AppError> {
        track_upstream("activities", self.get("/api/reports/activities", Some(session))).await
    }

    pub async fn volunteer_overview(
        &self,
        session: &AdminSession,
    ) -> Result<VolunteerOverview, AppError> {
        track_upstream(
            "volunteer_overview",
            self.get("/api/reports/volunteer-overview", Some(session)),
        )
        .await
    }

    pub async fn event_reports(&self, session: &AdminSession) -> Result<Vec<EventSummary>, AppError> {
        track_upstream("event_reports", self.get("/api/reports/events", Some(session))).await
    }

    pub async fn categories(&self, session: &AdminSession) -> Result<Vec<CategoryCount>, AppError> {
        track_upstream("categories", self.get("/api/reports/categories", Some(session))).await
    }

    pub async fn event_report_detail(
        &self,
        session: &AdminSession,
        name: &str,
    ) -> Result<EventSummary, AppError> {
        let path = format!("/api/reports/event/{}/detail", encode_segment(name));
        track_upstream("event_report_detail", self.get(&path, Some(session))).await
    }
}

/// 对路径段做百分号编码
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
