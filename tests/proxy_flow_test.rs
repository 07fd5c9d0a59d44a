//! End-to-end DSP relay flows: authenticated queries against a mock upstream
//! and the full failure-translation contract.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{build_router, issue_token, json_request, response_json, send, signup_user, test_config};

/// Router wired to the given mock upstream, plus a token for a signed-up user.
async fn router_with_upstream(upstream: &MockServer) -> (axum::Router, String) {
    let mut config = test_config();
    config.upstream.base_url = upstream.uri();
    let router = build_router(config).await;
    let token = signup_user(&router, "a@x.com", "secret1").await;
    (router, token)
}

#[tokio::test]
async fn upstream_json_body_is_relayed_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .and(body_json(json!({"query": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": 42})))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"answer": 42}));
}

#[tokio::test]
async fn extras_pass_through_but_unknown_fields_do_not() {
    let upstream = MockServer::start().await;
    // Only the allow-listed body shape matches; a forwarded `evil` field
    // would miss this mock and fail the test.
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .and(body_json(json!({"query": "hello", "extras": {"locale": "en"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/dsp/query",
            &json!({"query": "hello", "extras": {"locale": "en"}, "evil": "field"}),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"ok": true}));
}

#[tokio::test]
async fn non_json_upstream_success_is_wrapped_as_data() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "ping"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"data": "pong"}));
}

#[tokio::test]
async fn upstream_timeout_maps_to_504() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"late": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "slow"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("upstream_timeout"));
    assert_eq!(body["status_code"], json!(504));
}

#[tokio::test]
async fn unreachable_upstream_maps_to_502() {
    let mut config = test_config();
    // Nothing listens on this port; the connection is refused.
    config.upstream.base_url = "http://127.0.0.1:1".to_string();
    let router = build_router(config).await;
    let token = signup_user(&router, "a@x.com", "secret1").await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(body["error"], json!("upstream_error"));
    assert_eq!(body["status_code"], json!(502));
}

#[tokio::test]
async fn upstream_500_with_json_body_flattens_to_502() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"msg": "boom"})))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response_json(response).await,
        json!({
            "error": "upstream_bad_response",
            "detail": {"status": 500, "body": {"msg": "boom"}},
            "status_code": 502
        })
    );
}

#[tokio::test]
async fn upstream_400_passes_through_as_400() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"reason": "bad query"})))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(response).await,
        json!({
            "error": "upstream_bad_response",
            "detail": {"status": 400, "body": {"reason": "bad query"}},
            "status_code": 400
        })
    );
}

#[tokio::test]
async fn upstream_404_also_flattens_to_502() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&upstream)
        .await;

    let (router, token) = router_with_upstream(&upstream).await;

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response_json(response).await;
    assert_eq!(body["detail"]["status"], json!(404));
    assert_eq!(body["detail"]["body"], json!("not here"));
}

#[tokio::test]
async fn expired_token_never_reaches_the_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dsp/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&upstream)
        .await;

    let (router, _) = router_with_upstream(&upstream).await;
    let expired = issue_token("a@x.com", -5);

    let response = send(
        &router,
        json_request("POST", "/dsp/query", &json!({"query": "hello"}), Some(&expired)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["detail"], json!("Token expired"));
}
