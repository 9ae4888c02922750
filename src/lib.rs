//! Wallet Gateway
//!
//! A gateway bridging a local wallet to a remote distributed-ledger
//! node: it issues read queries against the node's query API, aggregates
//! paginated results, resolves human-readable names to canonical object
//! ids, injects computed fees into operation batches, and coordinates
//! the broadcast/confirmation lifecycle of signed transactions. The same
//! capabilities are exposed to local peers as an RPC service under the
//! `query` and `wallet` namespaces.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────┐
//!                 │                 WALLET GATEWAY                  │
//!                 │                                                 │
//!  Local peer     │  ┌─────────┐   ┌──────────────────────────┐    │
//!  ───────────────┼─▶│   rpc   │──▶│  query (facade, paging,   │    │
//!  (WebSocket)    │  │ server  │   │  resolver, fee injector)  │───┼──▶ Remote
//!                 │  └────┬────┘   └──────────────────────────┘    │    node
//!                 │       │        ┌──────────────────────────┐    │  (WebSocket
//!                 │       └───────▶│  broadcast (coordinator,  │───┼──▶ JSON-RPC)
//!                 │                │  confirmation hub)        │    │
//!                 │                └────────────┬─────────────┘    │
//!                 │                             │                   │
//!                 │                ┌────────────▼─────────────┐    │
//!                 │                │  wallet (keystore,        │    │
//!                 │                │  accounts, signing)       │    │
//!                 │                └──────────────────────────┘    │
//!                 │                                                 │
//!                 │  ┌────────────────────────────────────────────┐│
//!                 │  │ config · observability · gateway lifecycle ││
//!                 │  └────────────────────────────────────────────┘│
//!                 └────────────────────────────────────────────────┘
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod gateway;
pub mod node;
pub mod observability;
pub mod query;
pub mod rpc;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{GatewayConnection, GatewayCore};
