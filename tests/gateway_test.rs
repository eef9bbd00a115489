// Gateway client against an in-process fake `/rpc` endpoint.

mod common;

use common::{closed_port_url, FakeGateway, Reply};
use openclaw_tools_mcp::gateway::{Gateway, GatewayClient, GatewayError, GatewayTransport};
use serde_json::json;
use std::time::Duration;

fn client(url: &str, token: Option<&str>) -> GatewayClient {
    GatewayClient::new(GatewayTransport::new(url, token, Duration::from_secs(5)))
}

#[tokio::test]
async fn posts_envelope_to_rpc_with_bearer_token() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {"jobs": []}}))]).await;
    let client = client(&gw.url(), Some("secret"));

    let result = client
        .call_tool("cron.list", json!({"includeDisabled": false}))
        .await
        .unwrap();
    assert_eq!(result, json!({"jobs": []}));

    let requests = gw.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/rpc");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(
        requests[0].body,
        json!({"method": "tools.cron.list", "params": {"includeDisabled": false}})
    );
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {}}))]).await;
    client(&gw.url(), None)
        .call_tool("cron.status", json!({}))
        .await
        .unwrap();
    assert!(gw.requests()[0].authorization.is_none());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {}}))]).await;
    client(&format!("{}/", gw.url()), None)
        .call_tool("cron.status", json!({}))
        .await
        .unwrap();
    let requests = gw.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/rpc");
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let gw = FakeGateway::start(vec![Reply::raw(500, "internal")]).await;
    let err = client(&gw.url(), None)
        .call_tool("cron.status", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Http { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn error_field_is_a_remote_error_with_its_message() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"error": "boom"}))]).await;
    let err = client(&gw.url(), None)
        .call_tool("memory.search", json!({"query": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(&err, GatewayError::Remote(m) if m == "boom"));
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn missing_result_defaults_to_empty_mapping() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({}))]).await;
    let result = client(&gw.url(), None)
        .call_tool("cron.run", json!({"id": "j1"}))
        .await
        .unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let gw = FakeGateway::start(vec![Reply::raw(200, "<html>")]).await;
    let err = client(&gw.url(), None)
        .call_tool("cron.status", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn sequential_calls_share_one_connection() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {}}))]).await;
    let client = client(&gw.url(), None);

    client.call_tool("cron.status", json!({})).await.unwrap();
    client.call_tool("cron.status", json!({})).await.unwrap();

    assert_eq!(gw.requests().len(), 2);
    assert_eq!(client.transport().clients_created(), 1);

    client.close().await;
    assert!(!client.transport().is_connected().await);
}

#[tokio::test]
async fn unreachable_gateway_is_a_request_error() {
    let err = client(&closed_port_url().await, None)
        .call_tool("cron.status", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Request(_)));
}

#[tokio::test]
async fn hung_gateway_times_out() {
    let gw = FakeGateway::silent().await;
    let client = GatewayClient::new(GatewayTransport::new(
        &gw.url(),
        None,
        Duration::from_millis(300),
    ));

    let err = client
        .call_tool("cron.status", json!({}))
        .await
        .unwrap_err();
    match err {
        GatewayError::Request(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
