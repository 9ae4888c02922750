use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Errors surfaced by the gateway client.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("connection closed before a response arrived")]
    Closed,
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client for a running wallet gateway.
pub struct GatewayClient {
    stream: Mutex<WsStream>,
    next_id: AtomicU64,
}

impl GatewayClient {
    /// Connect to the gateway's RPC endpoint (e.g. "ws://127.0.0.1:8091/rpc").
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self {
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
        })
    }

    /// Invoke one method and await its response.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, SdkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});

        let mut stream = self.stream.lock().await;
        stream
            .send(Message::Text(request.to_string().into()))
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        while let Some(frame) = stream.next().await {
            let frame = frame.map_err(|e| SdkError::Transport(e.to_string()))?;
            let Message::Text(text) = frame else { continue };
            let response: Value = serde_json::from_str(text.as_str())
                .map_err(|e| SdkError::Transport(e.to_string()))?;
            if response.get("id").and_then(Value::as_u64) != Some(id) {
                continue;
            }
            if let Some(error) = response.get("error") {
                return Err(SdkError::Rpc {
                    code: error["code"].as_i64().unwrap_or(-1),
                    message: error["message"].as_str().unwrap_or("unknown").to_string(),
                });
            }
            return Ok(response.get("result").cloned().unwrap_or(Value::Null));
        }
        Err(SdkError::Closed)
    }

    /// List every asset, issuer ids already resolved to names.
    pub async fn get_all_assets(&self) -> Result<Value, SdkError> {
        self.call("query.getAllAssets", json!([])).await
    }

    /// List an account's balances.
    pub async fn get_account_balances(&self, account: &str) -> Result<Value, SdkError> {
        self.call("query.getAccountBalances", json!([account])).await
    }

    /// Broadcast a batch of operations as one transaction.
    pub async fn broadcast_transaction(&self, operations: Value) -> Result<Value, SdkError> {
        self.call("wallet.broadcastTransaction", json!([operations]))
            .await
    }
}
