//! Signing of caller-supplied JSON payloads.

use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::query::QueryFacade;
use crate::wallet::{KeyStore, SigningService};

/// Sign a JSON object payload on behalf of a named account.
///
/// Only structurally valid JSON objects are signed. The account must
/// exist on the ledger and its memo key must be present in the local
/// key store. Returns the hex-encoded signature over the raw payload.
pub async fn sign_json_object(
    facade: &QueryFacade,
    keystore: &KeyStore,
    payload: &str,
    account_name: &str,
) -> GatewayResult<String> {
    if account_name.is_empty() {
        return Err(GatewayError::InvalidInput(
            "signing account name is required".to_string(),
        ));
    }
    let parsed: Value = serde_json::from_str(payload)
        .map_err(|_| GatewayError::InvalidInput("payload is not valid JSON".to_string()))?;
    if !parsed.is_object() {
        return Err(GatewayError::InvalidInput(
            "payload must be a JSON object".to_string(),
        ));
    }

    keystore.unlock().await?;

    let account = match facade.get_account_by_name(account_name).await {
        Ok(account) => account,
        Err(GatewayError::NotFound(_)) => {
            return Err(GatewayError::AccountNotFound(account_name.to_string()))
        }
        Err(e) => return Err(e),
    };

    let memo_key = account
        .pointer("/options/memo_key")
        .and_then(|key| key.as_str())
        .ok_or_else(|| GatewayError::KeyUnavailable(account_name.to_string()))?;

    keystore
        .sign_with(memo_key, payload.as_bytes())
        .ok_or_else(|| GatewayError::KeyUnavailable(account_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WalletAccountConfig, WalletConfig};
    use crate::testing::{StubNode, StubReply};
    use serde_json::{json, Value};
    use std::sync::Arc;

    const TEST_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const TEST_PUBKEY: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn keystore(env_var: &str) -> KeyStore {
        std::env::set_var(env_var, TEST_KEY);
        KeyStore::from_config(&WalletConfig {
            accounts: vec![WalletAccountConfig {
                name: "alice".to_string(),
                private_key_env: env_var.to_string(),
            }],
            auto_unlock: true,
        })
        .unwrap()
    }

    fn account_node() -> Arc<StubNode> {
        Arc::new(StubNode::new(|method, params| match method {
            "get_account_by_name" => match params[0].as_str().unwrap_or("") {
                "alice" => StubReply::Reply(json!({
                    "id": "1.2.17",
                    "name": "alice",
                    "options": {"memo_key": TEST_PUBKEY},
                })),
                "keyless" => StubReply::Reply(json!({
                    "id": "1.2.18",
                    "name": "keyless",
                    "options": {"memo_key": "02ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"},
                })),
                _ => StubReply::Reply(Value::Null),
            },
            _ => StubReply::Fail("unexpected".to_string()),
        }))
    }

    #[tokio::test]
    async fn test_signs_valid_object() {
        let facade = QueryFacade::new(account_node());
        let store = keystore("SIGN_TEST_OK");

        let signature = sign_json_object(&facade, &store, r#"{"memo": "hi"}"#, "alice")
            .await
            .unwrap();
        assert_eq!(signature.len(), 128);
    }

    #[tokio::test]
    async fn test_rejects_non_object_payload() {
        let facade = QueryFacade::new(account_node());
        let store = keystore("SIGN_TEST_NONOBJ");

        for payload in ["\"just a string\"", "[1,2]", "not json at all"] {
            let err = sign_json_object(&facade, &store, payload, "alice")
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::InvalidInput(_)), "{payload}");
        }
    }

    #[tokio::test]
    async fn test_missing_account_name() {
        let facade = QueryFacade::new(account_node());
        let store = keystore("SIGN_TEST_NONAME");

        let err = sign_json_object(&facade, &store, "{}", "").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let facade = QueryFacade::new(account_node());
        let store = keystore("SIGN_TEST_UNKNOWN");

        let err = sign_json_object(&facade, &store, "{}", "nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_key_not_held_locally() {
        let facade = QueryFacade::new(account_node());
        let store = keystore("SIGN_TEST_KEYLESS");

        let err = sign_json_object(&facade, &store, "{}", "keyless")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::KeyUnavailable(_)));
    }
}
