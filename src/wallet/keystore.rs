//! Private key storage and low-level signing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};

use crate::broadcast::transaction::PendingTransaction;
use crate::config::WalletConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::wallet::SigningService;

struct AccountKey {
    account: String,
    secret: SecretKey,
}

/// In-process key store holding secp256k1 keys, indexed by the
/// hex-encoded compressed public key.
pub struct KeyStore {
    secp: Secp256k1<All>,
    keys: HashMap<String, AccountKey>,
    names: Vec<String>,
    locked: AtomicBool,
    auto_unlock: bool,
}

impl KeyStore {
    /// Load keys from the environment variables named in the config.
    pub fn from_config(config: &WalletConfig) -> GatewayResult<Self> {
        let secp = Secp256k1::new();
        let mut keys = HashMap::new();
        let mut names = Vec::new();

        for account in &config.accounts {
            let key_hex = std::env::var(&account.private_key_env).map_err(|_| {
                GatewayError::InvalidInput(format!(
                    "environment variable {} is not set",
                    account.private_key_env
                ))
            })?;
            let bytes = hex::decode(key_hex.trim()).map_err(|e| {
                GatewayError::InvalidInput(format!(
                    "invalid private key for '{}': {}",
                    account.name, e
                ))
            })?;
            let secret = SecretKey::from_slice(&bytes).map_err(|e| {
                GatewayError::InvalidInput(format!(
                    "invalid private key for '{}': {}",
                    account.name, e
                ))
            })?;
            let public = PublicKey::from_secret_key(&secp, &secret);

            tracing::info!(account = %account.name, "Wallet key loaded");
            keys.insert(
                hex::encode(public.serialize()),
                AccountKey {
                    account: account.name.clone(),
                    secret,
                },
            );
            names.push(account.name.clone());
        }

        Ok(Self {
            secp,
            keys,
            names,
            locked: AtomicBool::new(!config.auto_unlock),
            auto_unlock: config.auto_unlock,
        })
    }

    /// Names of the accounts whose keys this store holds.
    pub fn account_names(&self) -> &[String] {
        &self.names
    }

    /// Lock the store; signing fails until `unlock` succeeds again.
    pub fn lock(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    /// Sign `payload` with the key matching the given public key.
    ///
    /// Returns the hex-encoded compact signature over the Keccak-256
    /// digest, or `None` when the store holds no such key.
    pub fn sign_with(&self, public_key_hex: &str, payload: &[u8]) -> Option<String> {
        let key = self.keys.get(public_key_hex)?;
        tracing::debug!(account = %key.account, "Signing payload");
        Some(self.sign(&key.secret, payload))
    }

    fn sign(&self, secret: &SecretKey, payload: &[u8]) -> String {
        let digest: [u8; 32] = Keccak256::digest(payload).into();
        let message = Message::from_digest(digest);
        let signature = self.secp.sign_ecdsa(&message, secret);
        hex::encode(signature.serialize_compact())
    }
}

#[async_trait]
impl SigningService for KeyStore {
    fn is_unlocked(&self) -> bool {
        !self.locked.load(Ordering::SeqCst)
    }

    async fn unlock(&self) -> GatewayResult<()> {
        if self.is_unlocked() {
            return Ok(());
        }
        if self.auto_unlock {
            self.locked.store(false, Ordering::SeqCst);
            return Ok(());
        }
        Err(GatewayError::AuthRequired)
    }

    async fn process_transaction(&self, tx: &mut PendingTransaction) -> GatewayResult<()> {
        if !self.is_unlocked() {
            return Err(GatewayError::AuthRequired);
        }
        if self.keys.is_empty() {
            return Err(GatewayError::KeyUnavailable("this wallet".to_string()));
        }

        let payload = tx.signing_payload()?;
        let signatures = self
            .keys
            .values()
            .map(|key| self.sign(&key.secret, &payload))
            .collect();
        tx.set_signatures(signatures);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalletAccountConfig;
    use crate::query::Operation;

    // secp256k1 secret key 1; its public key is the generator point.
    const TEST_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const TEST_PUBKEY: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn store_with(env_var: &str, auto_unlock: bool) -> KeyStore {
        std::env::set_var(env_var, TEST_KEY);
        KeyStore::from_config(&WalletConfig {
            accounts: vec![WalletAccountConfig {
                name: "alice".to_string(),
                private_key_env: env_var.to_string(),
            }],
            auto_unlock,
        })
        .unwrap()
    }

    #[test]
    fn test_key_loading_derives_public_key() {
        let store = store_with("KS_TEST_LOAD", true);
        assert_eq!(store.account_names(), ["alice".to_string()]);
        assert!(store.sign_with(TEST_PUBKEY, b"{}").is_some());
        assert!(store.sign_with("02ffff", b"{}").is_none());
    }

    #[test]
    fn test_signature_is_deterministic_hex() {
        let store = store_with("KS_TEST_SIGN", true);
        let first = store.sign_with(TEST_PUBKEY, b"{\"a\":1}").unwrap();
        let second = store.sign_with(TEST_PUBKEY, b"{\"a\":1}").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 128);
        assert!(first.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_missing_env_var_fails() {
        let result = KeyStore::from_config(&WalletConfig {
            accounts: vec![WalletAccountConfig {
                name: "bob".to_string(),
                private_key_env: "KS_TEST_UNSET_VAR".to_string(),
            }],
            auto_unlock: true,
        });
        assert!(matches!(result, Err(GatewayError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_lock_state() {
        let store = store_with("KS_TEST_LOCK", false);
        assert!(!store.is_unlocked());
        assert!(matches!(
            store.unlock().await,
            Err(GatewayError::AuthRequired)
        ));

        let auto = store_with("KS_TEST_AUTO", true);
        assert!(auto.is_unlocked());
        auto.lock();
        assert!(!auto.is_unlocked());
        auto.unlock().await.unwrap();
        assert!(auto.is_unlocked());
    }

    #[tokio::test]
    async fn test_process_transaction_signs() {
        let store = store_with("KS_TEST_PROCESS", true);
        let mut tx = PendingTransaction::new();
        tx.push_operation(Operation {
            code: 0,
            op: serde_json::json!({"from": "1.2.1"}),
        });

        store.process_transaction(&mut tx).await.unwrap();
        assert_eq!(tx.signatures().len(), 1);
        assert_eq!(tx.signatures()[0].len(), 128);
    }

    #[tokio::test]
    async fn test_process_transaction_requires_unlock() {
        let store = store_with("KS_TEST_PROCESS_LOCKED", false);
        let mut tx = PendingTransaction::new();
        let err = store.process_transaction(&mut tx).await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthRequired));
    }
}
