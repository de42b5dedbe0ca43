//! End-to-end forwarding tests against mock upstreams.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn post_relays_upstream_json() {
    let (backend, seen) =
        common::start_recording_backend(200, "application/json", r#"{"id": "abc"}"#).await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;

    let res = common::client()
        .post(format!("http://{}/api/notion/pages", proxy))
        .header("content-type", "application/json")
        .body(r#"{"parent": {"database_id": "db"}}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    common::assert_cors(res.headers());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": "abc" }));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].uri, "/api/notion/pages");
    assert_eq!(&seen[0].body[..], br#"{"parent": {"database_id": "db"}}"#);

    shutdown.trigger();
}

#[tokio::test]
async fn full_path_and_query_are_forwarded_in_order() {
    let (backend, seen) = common::start_recording_backend(200, "application/json", "{}").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;

    let res = common::client()
        .get(format!(
            "http://{}/api/notion/databases/xyz/query?b=2&a=1&b=3",
            proxy
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].uri, "/api/notion/databases/xyz/query?b=2&a=1&b=3");

    shutdown.trigger();
}

#[tokio::test]
async fn only_whitelisted_headers_reach_upstream() {
    let (backend, seen) = common::start_recording_backend(200, "application/json", "{}").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;
    let client = common::client();

    client
        .put(format!("http://{}/api/notion/pages/1", proxy))
        .header("content-type", "application/json")
        .header("authorization", "Bearer real-token")
        .header("cookie", "session=secret")
        .header("x-custom", "dropped")
        .body("{}")
        .send()
        .await
        .unwrap();

    client
        .get(format!("http://{}/api/notion/users", proxy))
        .send()
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].headers["authorization"], "Bearer real-token");
    assert_eq!(seen[0].headers["content-type"], "application/json");
    assert!(seen[0].headers.get("cookie").is_none());
    assert!(seen[0].headers.get("x-custom").is_none());
    assert!(seen[0].headers.get("x-request-id").is_none());

    assert_eq!(seen[1].headers["authorization"], "Bearer placeholder-token");
    assert!(seen[1].headers.get("content-type").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn get_and_delete_send_no_body() {
    let (backend, seen) = common::start_recording_backend(200, "application/json", "{}").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;
    let client = common::client();

    client
        .get(format!("http://{}/api/notion/pages/1", proxy))
        .body("ignored")
        .send()
        .await
        .unwrap();
    client
        .delete(format!("http://{}/api/notion/blocks/1", proxy))
        .body("ignored")
        .send()
        .await
        .unwrap();
    client
        .patch(format!("http://{}/api/notion/pages/1", proxy))
        .body("kept")
        .send()
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen[0].body.is_empty());
    assert_eq!(seen[1].method, "DELETE");
    assert!(seen[1].body.is_empty());
    assert_eq!(&seen[2].body[..], b"kept");

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_status_and_content_type_are_relayed() {
    let (backend, _) = common::start_recording_backend(404, "text/plain", "no such page").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api/notion/pages/missing", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["content-type"], "text/plain");
    common::assert_cors(res.headers());
    assert_eq!(res.text().await.unwrap(), "no such page");

    shutdown.trigger();
}

#[tokio::test]
async fn missing_upstream_content_type_defaults_to_json() {
    let backend = common::start_raw_backend(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
    )
    .await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api/notion/pages", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), "{}");

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_returns_503_payload() {
    let upstream = common::unreachable_addr().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(upstream)).await;

    let res = common::client()
        .post(format!("http://{}/api/notion/pages", proxy))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 503);
    assert_eq!(res.headers()["content-type"], "application/json");
    common::assert_cors(res.headers());

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream server unavailable");
    assert!(body["message"].as_str().unwrap().contains(&upstream.to_string()));
    assert_eq!(body["solution"], "npm start");

    shutdown.trigger();
}

#[tokio::test]
async fn repeated_failures_yield_identical_payloads() {
    let upstream = common::unreachable_addr().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(upstream)).await;
    let client = common::client();

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let res = client
            .get(format!("http://{}/api/notion/pages", proxy))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 503);
        bodies.push(res.json::<Value>().await.unwrap());
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);

    shutdown.trigger();
}

#[tokio::test]
async fn garbled_upstream_response_is_500() {
    let backend = common::start_raw_backend("this is not http\r\n\r\n").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api/notion/pages", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    common::assert_cors(res.headers());
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(body.get("solution").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn configured_timeout_returns_504() {
    let backend = common::start_silent_backend().await;
    let mut config = common::config_for(backend);
    config.upstream.request_timeout_secs = Some(1);
    let (proxy, shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{}/api/notion/pages", proxy))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 504);
    common::assert_cors(res.headers());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream request timed out");

    shutdown.trigger();
}

#[tokio::test]
async fn oversized_body_is_rejected_without_forwarding() {
    let (backend, seen) = common::start_recording_backend(200, "application/json", "{}").await;
    let mut config = common::config_for(backend);
    config.limits.max_body_bytes = 16;
    let (proxy, shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .post(format!("http://{}/api/notion/pages", proxy))
        .body("x".repeat(64))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    common::assert_cors(res.headers());
    assert!(seen.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (backend, _) = common::start_recording_backend(200, "application/json", "{}").await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(backend)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/api/notion/pages", proxy))
        .send()
        .await
        .unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);

    let res = client
        .get(format!("http://{}/api/notion/pages", proxy))
        .header("x-request-id", "caller-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "caller-chosen");

    shutdown.trigger();
}
