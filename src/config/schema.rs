//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Remote ledger node connection settings.
    pub node: NodeConfig,

    /// Local RPC exposure settings.
    pub rpc: RpcConfig,

    /// Wallet account and key settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// WebSocket endpoint of the remote node (e.g. "ws://127.0.0.1:8090").
    pub url: String,

    /// Per-call timeout in seconds. Elapsed calls surface as remote errors.
    pub call_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8090".to_string(),
            call_timeout_secs: 10,
        }
    }
}

/// Local RPC server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Bind address for the exposed RPC endpoint (e.g. "127.0.0.1:8091").
    pub bind_address: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8091".to_string(),
        }
    }
}

/// Wallet configuration.
///
/// Private key material is never placed in the config file; each account
/// names an environment variable holding its hex-encoded key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Accounts whose keys this gateway holds.
    pub accounts: Vec<WalletAccountConfig>,

    /// Unlock the signing service automatically on first use.
    /// When false, broadcasts and signing fail until unlocked.
    pub auto_unlock: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            auto_unlock: true,
        }
    }
}

/// A single wallet account entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletAccountConfig {
    /// Ledger account name.
    pub name: String,

    /// Environment variable holding the hex-encoded private key.
    pub private_key_env: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
