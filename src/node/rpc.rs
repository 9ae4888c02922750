//! The call seam to the remote node's query API.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayResult;

/// A single-call interface to the remote node.
///
/// Implementations perform exactly one round trip per `call` and do not
/// retry; transient failures come back as `GatewayError::Remote`.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Invoke `method` with positional `params`, returning the raw result.
    async fn call(&self, method: &str, params: Value) -> GatewayResult<Value>;
}
