//! Read-only queries against the remote node.
//!
//! # Responsibilities
//! - One method per read capability of the node's query API
//! - Aggregate paged listings (assets, account history) to exhaustion
//! - Map wire shapes to the stable caller-facing shapes
//!
//! # Design Decisions
//! - Stateless over a shared node handle; calls are safe to issue
//!   concurrently
//! - No local retry; transient failures surface as remote errors

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::node::NodeRpc;
use crate::query::paging::paginate;
use crate::query::resolver::IdentifierResolver;
use crate::query::types::{
    AccountRecord, Asset, AssetRecord, Balance, BalanceRecord, HistoryEntry, HistoryRecord,
    ObjectId, CORE_ASSET_ID, OLDEST_HISTORY_ID,
};

/// Fixed page size for aggregated listings.
pub const PAGE_SIZE: usize = 100;

/// Stateless wrapper over the node's query API.
#[derive(Clone)]
pub struct QueryFacade {
    node: Arc<dyn NodeRpc>,
    resolver: IdentifierResolver,
}

impl QueryFacade {
    pub fn new(node: Arc<dyn NodeRpc>) -> Self {
        let resolver = IdentifierResolver::new(Arc::clone(&node));
        Self { node, resolver }
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Fetch one object by canonical id.
    pub async fn get_object_by_id(&self, object_id: &str) -> GatewayResult<Value> {
        let objects = self.node.call("get_objects", json!([[object_id]])).await?;
        first_or_not_found(objects, || format!("object '{}'", object_id))
    }

    /// Look up one asset by symbol.
    pub async fn get_asset_by_symbol(&self, symbol: &str) -> GatewayResult<Value> {
        let assets = self
            .node
            .call("lookup_asset_symbols", json!([[symbol]]))
            .await?;
        first_or_not_found(assets, || format!("asset '{}'", symbol))
    }

    /// Fetch one account record by name.
    pub async fn get_account_by_name(&self, name: &str) -> GatewayResult<Value> {
        let account = self.node.call("get_account_by_name", json!([name])).await?;
        if account.is_null() {
            return Err(GatewayError::NotFound(format!("account '{}'", name)));
        }
        Ok(account)
    }

    /// List an account's balances in the stable `{amount, type}` shape.
    pub async fn get_account_balances(&self, account: &str) -> GatewayResult<Vec<Balance>> {
        let account_id = self.resolver.resolve_account(account).await?;
        let raw = self
            .node
            .call("get_account_balances", json!([account_id, []]))
            .await?;
        let records: Vec<BalanceRecord> =
            serde_json::from_value(raw).map_err(malformed_payload)?;
        Ok(records
            .into_iter()
            .map(|record| Balance {
                amount: record.amount,
                asset_type: record.asset_id,
            })
            .collect())
    }

    /// List every asset the node knows, issuer ids replaced by names.
    ///
    /// Pages `list_assets` to exhaustion (bound: last symbol), then one
    /// `get_accounts` round trip resolves all issuers at once. The node
    /// returns issuer records in request order, which pairs them back to
    /// their assets positionally.
    pub async fn get_all_assets(&self) -> GatewayResult<Vec<Asset>> {
        let node = Arc::clone(&self.node);
        let records = paginate(
            String::new(),
            PAGE_SIZE,
            move |bound| {
                let node = Arc::clone(&node);
                async move {
                    let page = node.call("list_assets", json!([bound, PAGE_SIZE])).await?;
                    serde_json::from_value::<Vec<AssetRecord>>(page).map_err(malformed_payload)
                }
            },
            |record: &AssetRecord| record.id.to_string(),
            |record| record.symbol.clone(),
        )
        .await?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let issuer_ids: Vec<&ObjectId> = records.iter().map(|record| &record.issuer).collect();
        let raw = self.node.call("get_accounts", json!([issuer_ids])).await?;
        let issuers: Vec<AccountRecord> = serde_json::from_value(raw).map_err(malformed_payload)?;
        if issuers.len() != records.len() {
            return Err(GatewayError::Remote(format!(
                "issuer lookup returned {} records for {} assets",
                issuers.len(),
                records.len()
            )));
        }

        Ok(records
            .into_iter()
            .zip(issuers)
            .map(|(record, issuer)| Asset {
                id: record.id,
                symbol: record.symbol,
                precision: record.precision,
                issuer: issuer.name,
            })
            .collect())
    }

    /// Aggregate an account's full history, oldest entry first.
    pub async fn get_account_history(&self, account: &str) -> GatewayResult<Vec<HistoryEntry>> {
        let account_id = self.resolver.resolve_account(account).await?;
        let node = Arc::clone(&self.node);
        let records = paginate(
            OLDEST_HISTORY_ID.to_string(),
            PAGE_SIZE,
            move |bound| {
                let node = Arc::clone(&node);
                let account_id = account_id.clone();
                async move {
                    let page = node
                        .call(
                            "get_account_history",
                            json!([account_id, OLDEST_HISTORY_ID, PAGE_SIZE, bound]),
                        )
                        .await?;
                    serde_json::from_value::<Vec<HistoryRecord>>(page).map_err(malformed_payload)
                }
            },
            |record: &HistoryRecord| record.id.to_string(),
            |record| record.id.to_string(),
        )
        .await?;

        Ok(records
            .into_iter()
            .map(|record| HistoryEntry {
                id: record.id,
                op_code: record.op.0,
            })
            .collect())
    }

    /// Ids of history entries carrying the given operation code.
    ///
    /// A pure filter over the aggregated history; costs no remote call
    /// beyond the aggregation itself.
    pub async fn get_account_history_by_op_code(
        &self,
        account: &str,
        op_code: u64,
    ) -> GatewayResult<Vec<ObjectId>> {
        let history = self.get_account_history(account).await?;
        Ok(history
            .into_iter()
            .filter(|entry| entry.op_code == op_code)
            .map(|entry| entry.id)
            .collect())
    }

    /// Request computed fees for a batch of wire-shape operations.
    pub async fn required_fees(&self, operations: &[Value]) -> GatewayResult<Vec<Value>> {
        let fees = self
            .node
            .call("get_required_fees", json!([operations, CORE_ASSET_ID]))
            .await?;
        serde_json::from_value(fees).map_err(malformed_payload)
    }
}

fn malformed_payload(error: serde_json::Error) -> GatewayError {
    GatewayError::Remote(format!("malformed node payload: {}", error))
}

/// Unwrap a one-element lookup response, treating null as a miss.
fn first_or_not_found(
    response: Value,
    what: impl FnOnce() -> String,
) -> GatewayResult<Value> {
    match response {
        Value::Array(mut items) if !items.is_empty() => {
            let first = items.swap_remove(0);
            if first.is_null() {
                Err(GatewayError::NotFound(what()))
            } else {
                Ok(first)
            }
        }
        _ => Err(GatewayError::NotFound(what())),
    }
}
