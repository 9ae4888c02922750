//! WebSocket server exposing the gateway's RPC methods.
//!
//! # Responsibilities
//! - Serve JSON-RPC over WebSocket at `/rpc`
//! - Dispatch concurrent requests per connection
//! - Report gateway status at `/health`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::Response,
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::gateway::GatewayCore;
use crate::rpc::methods::{handle_request, RpcRequest, RpcResponse};

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    core: Arc<GatewayCore>,
}

/// Build the router with the RPC and health endpoints.
pub fn build_router(core: Arc<GatewayCore>) -> Router {
    Router::new()
        .route("/rpc", get(rpc_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { core })
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}

/// Serve until the shutdown signal flips.
pub async fn run(
    listener: TcpListener,
    core: Arc<GatewayCore>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "RPC server starting");

    let app = build_router(core);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|closing| *closing).await;
        })
        .await?;

    tracing::info!("RPC server stopped");
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "accounts_ready": state.core.accounts().is_ready(),
    }))
}

async fn rpc_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state.core))
}

/// Serve one RPC connection.
///
/// Requests run concurrently; responses are funneled through a writer
/// task, so a slow broadcast never blocks a fast query on the same
/// connection.
async fn serve_socket(socket: WebSocket, core: Arc<GatewayCore>) {
    let (mut sink, mut source) = socket.split();
    let (replies, mut replies_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(text) = replies_rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = source.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<RpcRequest>(text.as_str()) {
            Ok(request) => {
                let core = Arc::clone(&core);
                let replies = replies.clone();
                tokio::spawn(async move {
                    let response = handle_request(&core, request).await;
                    let _ = replies.send(encode(&response));
                });
            }
            Err(e) => {
                let response =
                    RpcResponse::error(Value::Null, -32700, format!("parse error: {}", e));
                let _ = replies.send(encode(&response));
            }
        }
    }

    drop(replies);
    let _ = writer.await;
}

fn encode(response: &RpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"internal error"}}"#
            .to_string()
    })
}
