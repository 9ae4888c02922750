//! Client SDK for the wallet gateway's exposed RPC service.

pub mod client;

pub use client::{GatewayClient, SdkError};
