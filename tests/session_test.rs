// Full stdio session: MCP client lines in, real gateway client out.

mod common;

use common::{FakeGateway, Reply};
use openclaw_tools_mcp::config::BridgeConfig;
use openclaw_tools_mcp::gateway::GatewayClient;
use openclaw_tools_mcp::mcp::{McpServer, SessionState};
use openclaw_tools_mcp::tools::ToolRegistry;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn call_line(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string()
}

async fn run(gateway_url: &str, lines: &[String]) -> (McpServer, Vec<Value>) {
    let cfg = BridgeConfig {
        gateway_url: gateway_url.to_string(),
        timeout_secs: 5,
        ..Default::default()
    };
    let client = Arc::new(GatewayClient::from_config(&cfg));
    let mut server = McpServer::new(ToolRegistry::new(client));

    let input = lines.join("\n") + "\n";
    let mut output = Vec::new();
    server
        .serve(input.as_bytes(), &mut output, CancellationToken::new())
        .await
        .unwrap();

    let responses = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (server, responses)
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn session_recovers_after_gateway_500() {
    let gw = FakeGateway::start(vec![
        Reply::raw(500, "down"),
        Reply::json(200, json!({"result": {"jobs": []}})),
    ])
    .await;

    let (server, responses) = run(
        &gw.url(),
        &[
            call_line(1, "cron", json!({"action": "status"})),
            call_line(2, "cron", json!({"action": "list"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert!(text(&responses[0]).starts_with("Error: "));
    assert_eq!(responses[0]["result"]["isError"], true);

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(text(&responses[1]), r#"{"jobs":[]}"#);
    assert_eq!(server.state(), SessionState::Idle);

    let requests = gw.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].body,
        json!({"method": "tools.cron.list", "params": {"includeDisabled": false}})
    );
}

#[tokio::test]
async fn remote_error_is_reported_as_text() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"error": "job not found"}))]).await;

    let (_, responses) = run(
        &gw.url(),
        &[call_line(7, "cron", json!({"action": "run", "jobId": "nope"}))],
    )
    .await;

    assert_eq!(text(&responses[0]), "Error: job not found");
    assert_eq!(
        gw.requests()[0].body,
        json!({"method": "tools.cron.run", "params": {"id": "nope"}})
    );
}

#[tokio::test]
async fn local_validation_never_reaches_gateway() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {}}))]).await;

    let (_, responses) = run(
        &gw.url(),
        &[
            call_line(1, "cron", json!({"action": "update", "jobId": "j1"})),
            call_line(2, "memory_get", json!({})),
            call_line(3, "unknown_tool", json!({})),
        ],
    )
    .await;

    let texts: Vec<Value> = responses
        .iter()
        .map(|r| serde_json::from_str(text(r)).unwrap())
        .collect();
    assert_eq!(texts[0], json!({"error": "patch required for update action"}));
    assert_eq!(texts[1], json!({"error": "path required"}));
    assert_eq!(texts[2], json!({"error": "Unknown tool: unknown_tool"}));
    assert!(responses.iter().all(|r| r["result"]["isError"] == false));
    assert!(gw.requests().is_empty());
}

#[tokio::test]
async fn handshake_then_discovery() {
    let gw = FakeGateway::start(vec![Reply::json(200, json!({"result": {}}))]).await;
    let lines = [
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string(),
    ];

    let (_, responses) = run(&gw.url(), &lines).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["cron", "memory_search", "memory_get"]);
}
