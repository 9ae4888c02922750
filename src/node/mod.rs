//! Remote node subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (query facade, fee injector, confirmation hub)
//!     → rpc.rs (NodeRpc trait, the single seam to the remote node)
//!     → transport.rs (WebSocket JSON-RPC client, pending-call table)
//!     → remote ledger node
//! ```
//!
//! # Design Decisions
//! - One logical connection per client; no reconnect, no retry
//! - Transport failures surface as remote errors and abort the caller
//! - The trait seam keeps query logic testable without a live node

pub mod rpc;
pub mod transport;

pub use rpc::NodeRpc;
pub use transport::WsNodeClient;
