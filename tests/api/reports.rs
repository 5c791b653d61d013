use crate::helpers::{admin_cookie, spawn_app, spawn_app_with_upstream, unreachable_upstream};
use axum::http::StatusCode;

fn row_count(html: &str) -> usize {
    html.matches("class=\"selectable\"").count()
}

#[tokio::test]
async fn reports_page_without_session_shows_sign_in() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/reports", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Administrator access"));
    // 受限内容不会被渲染
    assert!(!html.contains("Event reports"));
}

#[tokio::test]
async fn reports_page_renders_loading_list_and_falls_back_per_section() {
    let app = spawn_app().await;

    let (status, headers, html) = app.get("/app/reports", Some(&admin_cookie())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Event reports"));
    assert!(html.contains("hx-trigger=\"load\""));
    assert!(html.contains("No categories reported."));

    // 分类接口失败，其余区块使用真实数据
    let trigger = headers.get("HX-Trigger").expect("toast header").to_str().unwrap();
    assert!(trigger.contains("showToast"));
    assert!(trigger.contains("categories"));
    assert!(!trigger.contains("dashboard stats"));
}

#[tokio::test]
async fn reports_page_with_rejected_token_asks_to_sign_in_again() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/app/reports", Some("admin_session=wrong")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("session has expired"));
}

#[tokio::test]
async fn reports_page_uses_fallback_data_when_upstream_is_down() {
    let app = spawn_app_with_upstream(&unreachable_upstream().await);

    let (status, headers, html) = app.get("/app/reports", Some(&admin_cookie())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Event reports"));
    let trigger = headers.get("HX-Trigger").expect("toast header").to_str().unwrap();
    assert!(trigger.contains("warning"));
    assert!(trigger.contains("dashboard stats"));
}

#[tokio::test]
async fn event_list_without_session_renders_sign_in_prompt() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/block/reports/events", None).await;

    // htmx 只替换 2xx 响应
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("sign-in-prompt"));
    assert_eq!(row_count(&html), 0);
}

#[tokio::test]
async fn event_list_with_rejected_token_renders_sign_in_prompt() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/reports/events", Some("admin_session=wrong"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("sign-in-prompt"));
    assert!(html.contains("session has expired"));
}

#[tokio::test]
async fn event_list_falls_back_to_empty_when_upstream_is_down() {
    let app = spawn_app_with_upstream(&unreachable_upstream().await);

    let (status, headers, html) = app
        .get("/block/reports/events?q=fair", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_count(&html), 0);
    assert!(html.contains("empty-state"));
    // 加载占位被替换，不会停留在加载状态
    assert!(!html.contains("hx-trigger=\"load\""));
    let trigger = headers.get("HX-Trigger").expect("toast header").to_str().unwrap();
    assert!(trigger.contains("error"));
}

#[tokio::test]
async fn event_detail_degrades_when_upstream_is_down() {
    let app = spawn_app_with_upstream(&unreachable_upstream().await);

    let (status, headers, html) = app
        .get("/block/reports/events/evt-1?q=fair", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("event-report-unavailable"));
    assert!(html.contains("hx-get=\"/block/reports/events?q=fair\""));
    assert!(headers.contains_key("HX-Trigger"));
}

#[tokio::test]
async fn event_detail_with_rejected_token_renders_sign_in_prompt() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/reports/events/evt-1", Some("admin_session=wrong"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("session has expired"));
    assert!(!html.contains("Green Earth Sustainability Fair"));
}

#[tokio::test]
async fn empty_query_lists_every_event_in_order() {
    let app = spawn_app().await;

    let (status, _, html) = app.get("/block/reports/events", Some(&admin_cookie())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_count(&html), 4);
    let first = html.find("data-event-id=\"evt-1\"").unwrap();
    let second = html.find("data-event-id=\"evt-2\"").unwrap();
    let third = html.find("data-event-id=\"evt-3\"").unwrap();
    let fourth = html.find("data-event-id=\"evt-4\"").unwrap();
    assert!(first < second && second < third && third < fourth);
}

#[tokio::test]
async fn filter_is_case_insensitive_substring_match() {
    let app = spawn_app().await;

    let (_, _, html) = app
        .get("/block/reports/events?q=%20FAIR%20", Some(&admin_cookie()))
        .await;

    assert_eq!(row_count(&html), 1);
    assert!(html.contains("data-event-id=\"evt-1\""));
    assert!(html.contains("Green Earth Sustainability Fair"));
    // 行上的详情链接带着去掉首尾空白后的原样筛选文字
    assert!(html.contains("?q=FAIR"));
}

#[tokio::test]
async fn unmatched_filter_shows_empty_state() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/reports/events?q=marathon", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_count(&html), 0);
    assert!(html.contains("empty-state"));
    assert!(html.contains("marathon"));
}

#[tokio::test]
async fn list_is_paginated() {
    let app = spawn_app().await;

    let (_, _, html) = app
        .get("/block/reports/events?per_page=2", Some(&admin_cookie()))
        .await;
    assert_eq!(row_count(&html), 2);
    assert!(html.contains("Next"));

    let (_, _, html) = app
        .get("/block/reports/events?per_page=2&page=2", Some(&admin_cookie()))
        .await;
    assert_eq!(row_count(&html), 2);
    assert!(html.contains("data-event-id=\"evt-3\""));
    assert!(html.contains("data-event-id=\"evt-4\""));
}

#[tokio::test]
async fn selecting_a_row_and_going_back_restores_the_filter() {
    let app = spawn_app().await;

    let (status, _, detail) = app
        .get("/block/reports/events/evt-1?q=fair", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(detail.contains("data-event-id=\"evt-1\""));
    assert!(detail.contains("Green Earth Sustainability Fair"));
    assert!(detail.contains("hx-get=\"/block/reports/events?q=fair\""));
    assert!(detail.contains("3:1"));
    assert!(detail.contains("width: 25.0%"));
    assert!(detail.contains("60.0%"));
    assert!(detail.contains("Based on 10 reviews"));

    // 返回按钮请求的列表与之前一致
    let (_, _, list) = app
        .get("/block/reports/events?q=fair", Some(&admin_cookie()))
        .await;
    assert_eq!(row_count(&list), 1);
    assert!(list.contains("data-event-id=\"evt-1\""));
}

#[tokio::test]
async fn detail_with_zero_counts_never_renders_nan() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/reports/events/evt-2", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("NaN"));
    assert!(!html.contains("inf%"));
    assert!(html.contains("N/A"));
    assert!(html.contains("width: 0.0%"));
    assert!(html.contains("Date to be announced"));
    assert!(html.contains("Based on 0 reviews"));
}

#[tokio::test]
async fn unknown_event_detail_keeps_the_back_button() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/block/reports/events/evt-404?q=coat", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("event-report-unavailable"));
    assert!(html.contains("hx-get=\"/block/reports/events?q=coat\""));
}

#[tokio::test]
async fn event_with_null_rating_and_counts_still_renders() {
    let app = spawn_app().await;

    let (status, _, list) = app
        .get("/block/reports/events?q=orchard", Some(&admin_cookie()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_count(&list), 1);

    let (status, _, html) = app
        .get("/block/reports/events/evt-4", Some(&admin_cookie()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Orchard Open Day"));
    assert!(html.contains("N/A"));
    assert!(html.contains("Date to be announced"));
    assert!(!html.contains("NaN"));
}

#[tokio::test]
async fn report_page_by_name_decodes_the_path() {
    let app = spawn_app().await;

    let (status, _, html) = app
        .get("/app/reports/events/by-name/Winter%20Coat%20Drive", Some(&admin_cookie()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Winter Coat Drive"));
    assert!(html.contains("Based on 5 reviews"));
}
