//! The exposed method table and request dispatch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::GatewayCore;
use crate::observability::metrics;
use crate::query::Operation;

/// One JSON-RPC request frame.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// One JSON-RPC response frame.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Handle one request against the method table.
pub async fn handle_request(core: &GatewayCore, request: RpcRequest) -> RpcResponse {
    tracing::debug!(method = %request.method, "RPC request");
    match dispatch(core, &request.method, request.params).await {
        Some(Ok(result)) => {
            metrics::record_rpc_request(&request.method, true);
            RpcResponse::result(request.id, result)
        }
        Some(Err(e)) => {
            metrics::record_rpc_request(&request.method, false);
            RpcResponse::error(request.id, error_code(&e), e.to_string())
        }
        None => {
            metrics::record_rpc_request(&request.method, false);
            RpcResponse::error(
                request.id,
                -32601,
                format!("method '{}' not found", request.method),
            )
        }
    }
}

/// The fixed method table, published under the `query` and `wallet`
/// namespaces. Returns `None` for unknown methods.
async fn dispatch(
    core: &GatewayCore,
    method: &str,
    params: Value,
) -> Option<GatewayResult<Value>> {
    let outcome = match method {
        "query.getObjectById" => match params_as::<(String,)>(params) {
            Ok((id,)) => core.facade().get_object_by_id(&id).await,
            Err(e) => Err(e),
        },
        "query.getAssetBySymbol" => match params_as::<(String,)>(params) {
            Ok((symbol,)) => core.facade().get_asset_by_symbol(&symbol).await,
            Err(e) => Err(e),
        },
        "query.getAllAssets" => core.facade().get_all_assets().await.map(into_value),
        "query.getAccountByName" => match params_as::<(String,)>(params) {
            Ok((name,)) => core.facade().get_account_by_name(&name).await,
            Err(e) => Err(e),
        },
        "query.getAccountBalances" => match params_as::<(String,)>(params) {
            Ok((account,)) => core
                .facade()
                .get_account_balances(&account)
                .await
                .map(into_value),
            Err(e) => Err(e),
        },
        "query.getAccountHistory" => match params_as::<(String,)>(params) {
            Ok((account,)) => core
                .facade()
                .get_account_history(&account)
                .await
                .map(into_value),
            Err(e) => Err(e),
        },
        "query.getAccountHistoryByOpCode" => match params_as::<(String, u64)>(params) {
            Ok((account, op_code)) => core
                .facade()
                .get_account_history_by_op_code(&account, op_code)
                .await
                .map(into_value),
            Err(e) => Err(e),
        },
        "query.getTransactionFees" => match params_as::<(Vec<Operation>,)>(params) {
            Ok((operations,)) => core.fees().inject_fees(operations).await.map(into_value),
            Err(e) => Err(e),
        },
        "wallet.getMyAccounts" => Ok(into_value(core.accounts().my_accounts().await)),
        "wallet.signJsonObject" => match params_as::<(String, String)>(params) {
            Ok((payload, account)) => core
                .sign_json_object(&payload, &account)
                .await
                .map(Value::String),
            Err(e) => Err(e),
        },
        "wallet.broadcastTransaction" => match params_as::<(Vec<Operation>,)>(params) {
            Ok((operations,)) => core.broadcast(operations).await.map(into_value),
            Err(e) => Err(e),
        },
        _ => return None,
    };
    Some(outcome)
}

fn params_as<T: DeserializeOwned>(params: Value) -> GatewayResult<T> {
    serde_json::from_value(params)
        .map_err(|e| GatewayError::InvalidInput(format!("bad params: {}", e)))
}

fn into_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Map gateway errors onto JSON-RPC error codes.
pub fn error_code(error: &GatewayError) -> i64 {
    match error {
        GatewayError::Remote(_) => -32000,
        GatewayError::NotFound(_) => -32001,
        GatewayError::SizeMismatch { .. } => -32002,
        GatewayError::AuthRequired => -32003,
        GatewayError::AccountNotFound(_) => -32004,
        GatewayError::KeyUnavailable(_) => -32005,
        GatewayError::BroadcastFailed(_) => -32006,
        GatewayError::InvalidInput(_) => -32602,
    }
}
