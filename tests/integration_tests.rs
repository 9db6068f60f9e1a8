//! End-to-end flows through the full router.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::TestContext;
use tinylink::api::types::{ShortenResponse, StatsResponse};

#[tokio::test]
async fn test_shorten_redirect_stats_scenario() {
    let ctx = TestContext::new();
    let app = tinylink_app!(ctx);

    // 1. 创建短链
    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header(("Host", "sho.rt"))
        .set_json(json!({"url": "https://example.com", "expire_in_days": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: ShortenResponse = test::read_body_json(resp).await;
    let code = created.short_url.trim_start_matches("http://sho.rt/").to_string();
    assert_eq!(code.len(), 5);

    // 2. 跳转两次
    for _ in 0..2 {
        let resp =
            test::call_service(&app, TestRequest::get().uri(&format!("/{code}")).to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("Location").unwrap(), "https://example.com");
    }
    ctx.wait_for_clicks(&code, 2).await;

    // 3. 查看统计
    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/stats/{code}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: StatsResponse = test::read_body_json(resp).await;
    assert_eq!(stats.original_url, "https://example.com");
    assert_eq!(stats.click_count, 2);

    let created_at = chrono::DateTime::parse_from_rfc3339(&stats.created_at).unwrap();
    assert_eq!(stats.expiration, created_at.timestamp() + 7 * 86_400);
}

#[tokio::test]
async fn test_unknown_routes_are_404() {
    let ctx = TestContext::new();
    let app = tinylink_app!(ctx);

    let requests = [
        TestRequest::get().uri("/a/b"),
        TestRequest::get().uri("/stats/a/b"),
        TestRequest::put().uri("/shorten"),
        TestRequest::get().uri("/shorten"),
        TestRequest::delete().uri("/stats/abcde"),
        TestRequest::post().uri("/"),
    ];

    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Not Found"}));
    }
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let ctx = TestContext::new();
    ctx.seed("abcde", "https://example.com").await;
    let app = tinylink_app!(ctx);

    for uri in ["/abcde", "/stats/abcde", "/nope1", "/a/b"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert!(
            resp.headers().contains_key("x-request-id"),
            "missing request id for {uri}"
        );
    }
}

#[tokio::test]
async fn test_expired_link_is_gone() {
    let ctx = TestContext::new();
    let mut record = ctx.seed("fresh", "https://example.com").await;
    record.short_code = "stale".to_string();
    record.expiration = 1;
    tinylink::storage::UrlStore::create(ctx.store.inner(), &record)
        .await
        .unwrap();
    let app = tinylink_app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/stale").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = test::call_service(&app, TestRequest::get().uri("/stats/stale").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = test::call_service(&app, TestRequest::get().uri("/fresh").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}
