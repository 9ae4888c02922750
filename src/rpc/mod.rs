//! Local RPC exposure subsystem.
//!
//! # Data Flow
//! ```text
//! Local peer (WebSocket client)
//!     → server.rs (axum upgrade, per-connection loop)
//!     → methods.rs (fixed method table: query.*, wallet.*)
//!     → gateway core (facade, fee injector, wallet, broadcast)
//! ```
//!
//! # Design Decisions
//! - The method table is fixed and registered exactly once per server
//! - Requests on one connection run concurrently; replies are written
//!   by a single writer task
//! - Gateway errors map onto stable JSON-RPC error codes

pub mod methods;
pub mod server;

pub use methods::{RpcError, RpcRequest, RpcResponse};
