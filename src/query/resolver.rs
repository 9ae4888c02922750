//! Resolution of account names to canonical object ids.

use std::sync::Arc;

use serde_json::json;

use crate::error::{GatewayError, GatewayResult};
use crate::node::NodeRpc;
use crate::query::types::ObjectId;

/// Resolves a caller-supplied name-or-id string to exactly one object id.
#[derive(Clone)]
pub struct IdentifierResolver {
    node: Arc<dyn NodeRpc>,
}

impl IdentifierResolver {
    pub fn new(node: Arc<dyn NodeRpc>) -> Self {
        Self { node }
    }

    /// Resolve an account reference.
    ///
    /// Input that already carries the canonical id structure is returned
    /// unchanged without touching the node. Anything else costs exactly
    /// one `get_account_by_name` round trip.
    pub async fn resolve_account(&self, name_or_id: &str) -> GatewayResult<ObjectId> {
        if ObjectId::is_canonical(name_or_id) {
            return Ok(ObjectId::new(name_or_id));
        }

        let account = self
            .node
            .call("get_account_by_name", json!([name_or_id]))
            .await?;
        if account.is_null() {
            return Err(GatewayError::NotFound(format!("account '{}'", name_or_id)));
        }
        account
            .get("id")
            .and_then(|id| id.as_str())
            .map(ObjectId::new)
            .ok_or_else(|| GatewayError::Remote("account record missing id".to_string()))
    }
}
