//! WebSocket JSON-RPC client for the remote node.
//!
//! # Responsibilities
//! - Connect to the node's WebSocket endpoint
//! - Correlate requests and responses through a pending-call table
//! - Apply the per-call timeout and surface failures as remote errors
//!
//! # Design Decisions
//! - Requests carry a process-local atomic id; responses are routed by id
//! - A closed socket fails every in-flight call; callers see remote errors
//! - No reconnect logic; a fresh client is created on reconnect

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::{GatewayError, GatewayResult};
use crate::node::rpc::NodeRpc;
use crate::observability::metrics;

type PendingCalls = Arc<DashMap<u64, oneshot::Sender<GatewayResult<Value>>>>;

/// Response frame from the node: either `result` or `error` is set.
#[derive(Debug, Deserialize)]
struct ResponseFrame {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// JSON-RPC client over a single WebSocket connection.
pub struct WsNodeClient {
    outbox: mpsc::UnboundedSender<Message>,
    pending: PendingCalls,
    next_id: AtomicU64,
    call_timeout: Duration,
    _writer: JoinHandle<()>,
    _reader: JoinHandle<()>,
}

impl WsNodeClient {
    /// Connect to the node's WebSocket endpoint.
    pub async fn connect(url: &str, call_timeout: Duration) -> GatewayResult<Self> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| GatewayError::Remote(format!("connect to {} failed: {}", url, e)))?;
        tracing::info!(url = %url, "Connected to remote node");

        let (mut sink, mut source) = stream.split();
        let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<Message>();
        let pending: PendingCalls = Arc::new(DashMap::new());

        let writer = tokio::spawn(async move {
            while let Some(frame) = outbox_rx.recv().await {
                if sink.send(frame).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_pending = Arc::clone(&pending);
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => route_response(&reader_pending, text.as_str()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Node connection error");
                        break;
                    }
                }
            }
            fail_pending(&reader_pending, "connection closed");
        });

        Ok(Self {
            outbox,
            pending,
            next_id: AtomicU64::new(1),
            call_timeout,
            _writer: writer,
            _reader: reader,
        })
    }

    /// Close the connection. In-flight calls fail with a remote error.
    pub fn close(&self) {
        let _ = self.outbox.send(Message::Close(None));
        fail_pending(&self.pending, "connection closed");
    }
}

#[async_trait]
impl NodeRpc for WsNodeClient {
    async fn call(&self, method: &str, params: Value) -> GatewayResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);

        let frame = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!(id = id, method = %method, "Node call");

        let outcome = if self.outbox.send(Message::Text(frame.to_string().into())).is_err() {
            self.pending.remove(&id);
            Err(GatewayError::Remote("connection closed".to_string()))
        } else {
            match timeout(self.call_timeout, rx).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => Err(GatewayError::Remote("connection closed".to_string())),
                Err(_) => {
                    self.pending.remove(&id);
                    Err(GatewayError::Remote(format!(
                        "call '{}' timed out after {:?}",
                        method, self.call_timeout
                    )))
                }
            }
        };

        metrics::record_node_call(method, outcome.is_ok());
        outcome
    }
}

/// Route one response frame to the call that issued it.
fn route_response(pending: &PendingCalls, text: &str) {
    let frame: ResponseFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable frame from node");
            return;
        }
    };

    let Some((_, tx)) = pending.remove(&frame.id) else {
        tracing::trace!(id = frame.id, "Response for unknown call");
        return;
    };

    let outcome = match (frame.result, frame.error) {
        (_, Some(error)) => Err(GatewayError::Remote(describe_node_error(&error))),
        (Some(result), None) => Ok(result),
        (None, None) => Ok(Value::Null),
    };
    let _ = tx.send(outcome);
}

/// Fail every in-flight call with a remote error.
fn fail_pending(pending: &PendingCalls, reason: &str) {
    let ids: Vec<u64> = pending.iter().map(|entry| *entry.key()).collect();
    for id in ids {
        if let Some((_, tx)) = pending.remove(&id) {
            let _ = tx.send(Err(GatewayError::Remote(reason.to_string())));
        }
    }
}

fn describe_node_error(error: &Value) -> String {
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// Serve one WebSocket connection, answering every request with
    /// `{"echo": <method>}` except "missing", which gets an error frame.
    async fn spawn_stub_node(addr: &str) {
        let listener = TcpListener::bind(addr).await.unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            while let Some(Ok(Message::Text(text))) = ws.next().await {
                let frame: Value = serde_json::from_str(text.as_str()).unwrap();
                let id = frame["id"].as_u64().unwrap();
                let method = frame["method"].as_str().unwrap();
                let reply = if method == "missing" {
                    serde_json::json!({"id": id, "error": {"message": "unknown method"}})
                } else {
                    serde_json::json!({"id": id, "result": {"echo": method}})
                };
                ws.send(Message::Text(reply.to_string().into())).await.unwrap();
            }
        });
    }

    #[tokio::test]
    async fn test_call_roundtrip() {
        spawn_stub_node("127.0.0.1:29711").await;
        let client = WsNodeClient::connect("ws://127.0.0.1:29711", Duration::from_secs(5))
            .await
            .unwrap();

        let result = client.call("list_assets", serde_json::json!([])).await.unwrap();
        assert_eq!(result["echo"], "list_assets");
    }

    #[tokio::test]
    async fn test_error_frame_surfaces_as_remote_error() {
        spawn_stub_node("127.0.0.1:29712").await;
        let client = WsNodeClient::connect("ws://127.0.0.1:29712", Duration::from_secs(5))
            .await
            .unwrap();

        let err = client.call("missing", serde_json::json!([])).await.unwrap_err();
        assert!(matches!(err, GatewayError::Remote(_)));
        assert!(err.to_string().contains("unknown method"));
    }

    #[tokio::test]
    async fn test_call_timeout() {
        // A listener that accepts the handshake but never answers.
        let listener = TcpListener::bind("127.0.0.1:29713").await.unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        });

        let client = WsNodeClient::connect("ws://127.0.0.1:29713", Duration::from_millis(100))
            .await
            .unwrap();
        let err = client.call("get_objects", serde_json::json!([])).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
