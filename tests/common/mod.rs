//! Shared utilities for integration testing.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use gateway_sdk::GatewayClient;
use wallet_gateway::config::{GatewayConfig, WalletConfig};
use wallet_gateway::GatewayConnection;

/// What the mock node answers to one call.
pub enum MockReply {
    Result(Value),
    Error(i64, String),
}

/// Start a scripted mock node speaking JSON-RPC over WebSocket.
///
/// The handler receives (method, params) for every call and is shared
/// across connections.
pub async fn start_mock_node(
    addr: &str,
    handler: impl Fn(&str, &Value) -> MockReply + Send + Sync + 'static,
) {
    let listener = TcpListener::bind(addr).await.unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        let mut ws = match accept_async(socket).await {
                            Ok(ws) => ws,
                            Err(_) => return,
                        };
                        while let Some(Ok(message)) = ws.next().await {
                            let Message::Text(text) = message else { continue };
                            let frame: Value = match serde_json::from_str(text.as_str()) {
                                Ok(frame) => frame,
                                Err(_) => continue,
                            };
                            let id = frame["id"].clone();
                            let method = frame["method"].as_str().unwrap_or("").to_string();
                            let params = frame["params"].clone();

                            let response = match handler(&method, &params) {
                                MockReply::Result(result) => {
                                    serde_json::json!({"id": id, "result": result})
                                }
                                MockReply::Error(code, message) => serde_json::json!({
                                    "id": id,
                                    "error": {"code": code, "message": message},
                                }),
                            };
                            if ws
                                .send(Message::Text(response.to_string().into()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a gateway against a running mock node.
#[allow(dead_code)]
pub async fn start_gateway(
    node_addr: &str,
    rpc_addr: &str,
    wallet: WalletConfig,
) -> GatewayConnection {
    let mut config = GatewayConfig::default();
    config.node.url = format!("ws://{}", node_addr);
    config.rpc.bind_address = rpc_addr.to_string();
    config.wallet = wallet;

    let connection = GatewayConnection::new(config);
    connection
        .connect(&format!("ws://{}", node_addr))
        .await
        .expect("gateway should connect");
    connection
}

/// Connect an SDK client to a gateway's RPC endpoint, retrying while
/// the server task finishes binding.
#[allow(dead_code)]
pub async fn connect_client(rpc_addr: &str) -> GatewayClient {
    let url = format!("ws://{}/rpc", rpc_addr);
    for _ in 0..40 {
        if let Ok(client) = GatewayClient::connect(&url).await {
            return client;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway RPC endpoint not reachable at {}", url);
}
