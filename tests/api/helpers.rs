use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use ngo_event_portal::{api::ApiClient, config::AppConfig, routes::create_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "tok";

pub struct TestApp {
    pub app: Router,
    pub upstream: String,
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_form(&self, method: &str, uri: &str, form: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }
}

pub fn admin_cookie() -> String {
    format!("admin_session={ADMIN_TOKEN}")
}

/// 启动门户，上游指向给定地址
pub fn spawn_app_with_upstream(upstream: &str) -> TestApp {
    let mut config = AppConfig::default();
    config.api.base_url = upstream.to_string();
    config.api.timeout_seconds = 2;
    let api = ApiClient::new(&config.api).expect("failed to build api client");
    TestApp {
        app: create_router(AppState::new(config, api)),
        upstream: upstream.to_string(),
    }
}

/// 启动模拟上游和门户
pub async fn spawn_app() -> TestApp {
    let upstream = spawn_upstream().await;
    spawn_app_with_upstream(&upstream)
}

/// 一个不可达的上游地址：绑定后立即释放端口
pub async fn unreachable_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn spawn_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_upstream()).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {ADMIN_TOKEN}"))
        .unwrap_or(false)
}

fn guarded(headers: &HeaderMap, body: Value) -> Response {
    if authorized(headers) {
        Json(body).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

pub fn report_events() -> Value {
    json!([
        {
            "_id": "evt-1",
            "name": "Green Earth Sustainability Fair",
            "images": ["https://img.example.org/fair.jpg"],
            "date": "2025-04-22",
            "volunteerCount": 25,
            "participantCount": 75,
            "rating": 4.5,
            "ratingDistribution": { "5": 6, "4": 3, "3": 1 }
        },
        {
            "_id": "evt-2",
            "name": "Beach Cleanup",
            "date": "",
            "volunteerCount": 0,
            "participantCount": 0,
            "rating": 0
        },
        {
            "_id": "evt-3",
            "name": "Winter Coat Drive",
            "date": "2025-12-01T09:00:00Z",
            "volunteerCount": 4,
            "participantCount": 12,
            "rating": 3.8,
            "ratingDistribution": { "5": "2", "4": 2, "1": 1 }
        },
        {
            "_id": "evt-4",
            "name": "Orchard Open Day",
            "images": null,
            "date": null,
            "volunteerCount": null,
            "participantCount": 8,
            "rating": null,
            "ratingDistribution": null
        }
    ])
}

/// id 为 `past` 的活动已经开始
fn public_event(id: &str) -> Value {
    let date = if id == "past" { "2000-01-01" } else { "2099-06-01" };
    json!({
        "_id": id,
        "name": "Community Tree Planting",
        "location": "Riverside Park",
        "date": date,
        "description": "Plant native trees along the river.",
        "photos": [],
        "reviews": [{ "rating": 5, "comment": "Great day" }],
        "volunteersAssigned": [],
        "schedule": [{ "time": "09:00", "title": "Welcome" }]
    })
}

fn mock_upstream() -> Router {
    Router::new()
        .route(
            "/api/reports/events",
            get(|headers: HeaderMap| async move { guarded(&headers, report_events()) }),
        )
        .route(
            "/api/reports/dashboard",
            get(|headers: HeaderMap| async move {
                guarded(
                    &headers,
                    json!({ "totalEvents": 3, "totalVolunteers": 29, "totalParticipants": 87, "averageRating": 4.1 }),
                )
            }),
        )
        .route(
            "/api/reports/activities",
            get(|headers: HeaderMap| async move {
                guarded(
                    &headers,
                    json!([{ "title": "New volunteer", "description": "Ada joined", "timestamp": "2025-04-01" }]),
                )
            }),
        )
        .route(
            "/api/reports/volunteer-overview",
            get(|headers: HeaderMap| async move {
                guarded(
                    &headers,
                    json!({ "totalVolunteers": 29, "activeVolunteers": 20, "totalHours": 310, "topVolunteers": [] }),
                )
            }),
        )
        // 分类接口故意返回 500，验证单个区块的兜底
        .route(
            "/api/reports/categories",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/api/reports/event/:name/detail",
            get(|headers: HeaderMap, Path(name): Path<String>| async move {
                let found = report_events()
                    .as_array()
                    .and_then(|events| events.iter().find(|e| e["name"] == name.as_str()).cloned());
                match found {
                    Some(event) => guarded(&headers, event),
                    None => StatusCode::NOT_FOUND.into_response(),
                }
            }),
        )
        .route(
            "/api/event",
            get(|| async { Json(json!([public_event("pub-1")])) }),
        )
        .route(
            "/api/event/:id",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    StatusCode::NOT_FOUND.into_response()
                } else {
                    Json(public_event(&id)).into_response()
                }
            }),
        )
        .route(
            "/api/user/registerVolunteerOrPart",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "ok": true, "eventId": body["eventId"] }))
            }),
        )
        .route(
            "/api/user/leaderboard",
            get(|| async {
                Json(json!([
                    { "position": 2, "name": "Brian", "score": 80, "rank": "Silver" },
                    { "position": 1, "name": "Amina", "score": 120, "rank": "Gold" }
                ]))
            }),
        )
        .route(
            "/api/user/update-task-status",
            put(|Json(_): Json<Value>| async { Json(json!({ "ok": true })) }),
        )
        .route(
            "/api/user/:id",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "_id": id,
                    "name": "Ada Okafor",
                    "email": "ada@example.org",
                    "eventsSubscribed": [{
                        "eventId": "pub-1",
                        "name": "Community Tree Planting",
                        "participationType": "volunteer",
                        "tasks": [{ "taskName": "Hand out saplings", "status": "pending" }]
                    }],
                    "heatmapActivity": [
                        { "date": "2025-03-01", "count": 2 },
                        { "date": "2025-03-02", "count": 5 }
                    ]
                }))
            }),
        )
}
