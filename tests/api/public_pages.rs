use crate::helpers::{spawn_app, spawn_app_with_upstream, unreachable_upstream};
use axum::http::{header, StatusCode};

#[tokio::test]
async fn landing_page_features_upcoming_events() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Community Tree Planting"));
}

#[tokio::test]
async fn events_page_lists_cards_with_countdown() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/events", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Community Tree Planting"));
    assert!(html.contains("June 1, 2099"));
    assert!(html.contains("hx-trigger=\"every 1s\""));
}

#[tokio::test]
async fn events_page_degrades_when_upstream_is_down() {
    let app = spawn_app_with_upstream(&unreachable_upstream().await);

    let (status, headers, _) = app.get("/app/events", None).await;

    assert_eq!(status, StatusCode::OK);
    let trigger = headers.get("HX-Trigger").expect("toast header").to_str().unwrap();
    assert!(trigger.contains("error"));
}

#[tokio::test]
async fn event_page_shows_schedule_and_registration_form() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/events/pub-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Riverside Park"));
    assert!(html.contains("Welcome"));
    assert!(html.contains("sse-connect"));
    assert!(html.contains("Based on 1 review"));
}

#[tokio::test]
async fn started_event_page_does_not_open_a_stream() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/events/past", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This event has started"));
    assert!(!html.contains("sse-connect"));
}

#[tokio::test]
async fn countdown_stream_ends_with_finished_event() {
    let app = spawn_app().await;

    let (status, _, body) = app.get("/block/events/past/countdown/stream", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("event: finished"));
    assert!(body.contains("This event has started"));
    // 关闭后浏览器一天内不会重连
    assert!(body.contains("retry: 86400000"));
    assert!(!body.contains("event: countdown"));
}

#[tokio::test]
async fn oversized_form_body_is_rejected() {
    let app = spawn_app().await;
    let message = "x".repeat(80 * 1024);

    let (status, _, _) = app
        .send_form(
            "POST",
            "/api/events/pub-1/register",
            &format!("first_name=Ada&message={message}"),
        )
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn missing_event_is_not_found() {
    let app = spawn_app().await;

    let (status, _, _) = app.get("/app/events/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_registration_is_rejected_with_field_errors() {
    let app = spawn_app().await;

    let (status, headers, html) = app
        .send_form(
            "POST",
            "/api/events/pub-1/register",
            "first_name=Ada&last_name=Okafor&email=nope&phone=0700123456&participation_type=volunteer",
        )
        .await;

    // 表单以 200 返回，htmx 才会替换并显示字段错误
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("register-form"));
    assert!(html.contains("Enter a valid email address"));
    assert!(html.contains("You must accept the terms"));
    // 回显已填写的内容
    assert!(html.contains("Okafor"));
    assert!(headers.contains_key("HX-Trigger"));
}

#[tokio::test]
async fn valid_registration_is_forwarded_upstream() {
    let app = spawn_app().await;

    let (status, headers, html) = app
        .send_form(
            "POST",
            "/api/events/pub-1/register",
            "first_name=Ada&last_name=Okafor&email=ada%40example.org&phone=0700123456&participation_type=participant&terms=on",
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Thank you, Ada!"));
    assert!(html.contains("participant"));
    let trigger = headers.get("HX-Trigger").unwrap().to_str().unwrap();
    assert!(trigger.contains("success"));
}

#[tokio::test]
async fn leaderboard_is_sorted_by_position() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/leaderboard", None).await;

    assert_eq!(status, StatusCode::OK);
    let amina = html.find("Amina").unwrap();
    let brian = html.find("Brian").unwrap();
    assert!(amina < brian);
}

#[tokio::test]
async fn user_dashboard_summarises_activity() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/users/u-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Hello, Ada Okafor"));
    assert!(html.contains("Hand out saplings"));
    assert!(html.contains("<span class=\"stat-value\">7</span>"));
}

#[tokio::test]
async fn task_update_returns_refreshed_row() {
    let app = spawn_app().await;

    let (status, headers, html) = app
        .send_form(
            "PUT",
            "/api/users/u-1/tasks",
            "event_id=pub-1&task_name=Hand+out+saplings&status=completed",
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Hand out saplings"));
    assert!(html.trim_start().starts_with("<tr>"));
    assert!(headers.contains_key("HX-Trigger"));
}

#[tokio::test]
async fn countdown_fragment_stops_polling_once_started() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/countdown?target=2000-01-01T00%3A00%3A00Z", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This event has started"));
    assert!(!html.contains("hx-trigger"));

    let (status, _, _) = app.get("/block/countdown?target=soon", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn admin_session_sets_http_only_cookie() {
    let app = spawn_app().await;

    let (status, headers, _) = app
        .send_form("POST", "/app/admin/session", "token=tok")
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/app/reports");
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("admin_session=tok"));
    assert!(cookie.contains("HttpOnly"));

    let (status, _, _) = app.send_form("POST", "/app/admin/session", "token=+").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_reports_upstream_state() {
    let app = spawn_app().await;

    let (status, _, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["upstream"], "ok");
}

#[tokio::test]
async fn static_assets_are_embedded() {
    let app = spawn_app().await;

    let (status, headers, _) = app.get("/static/css/app.css", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/css"));

    let (status, _, _) = app.get("/static/missing.js", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
