//! Ledger object types and identifier conventions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical id of the core asset, used to denominate computed fees.
pub const CORE_ASSET_ID: &str = "1.3.0";

/// Oldest-entry sentinel for account history pagination.
pub const OLDEST_HISTORY_ID: &str = "1.11.0";

/// Category prefix of account object ids.
pub const ACCOUNT_ID_PREFIX: &str = "1.2.";

/// Canonical ledger object identifier of the form `space.type.instance`.
///
/// The leading fields carry the object category: accounts live under
/// `1.2.`, assets under `1.3.`, history entries under `1.11.`. Immutable
/// once obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Structural check: three dot-separated unsigned decimal fields.
    pub fn is_canonical(value: &str) -> bool {
        let mut fields = 0;
        for part in value.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            fields += 1;
        }
        fields == 3
    }

    /// Whether this id names an account object.
    pub fn is_account(&self) -> bool {
        self.0.starts_with(ACCOUNT_ID_PREFIX)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An asset as returned to callers: issuer resolved to an account name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: ObjectId,
    pub symbol: String,
    pub precision: u8,
    pub issuer: String,
}

/// An account balance in the stable `{amount, type}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub amount: i64,
    #[serde(rename = "type")]
    pub asset_type: ObjectId,
}

/// One account history entry, ordered by increasing id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: ObjectId,
    pub op_code: u64,
}

/// An operation destined for a transaction. The payload may carry a
/// `fee` field; it is absent while fees are being estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub code: u64,
    pub op: Value,
}

// Wire shapes as the node serializes them. Unknown fields are ignored.

/// Asset record from `list_assets`, issuer still an object id.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    pub id: ObjectId,
    pub symbol: String,
    pub precision: u8,
    pub issuer: ObjectId,
}

/// Account record from `get_accounts` / `get_account_by_name`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRecord {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub options: AccountOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountOptions {
    #[serde(default)]
    pub memo_key: Option<String>,
}

/// Balance record from `get_account_balances`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceRecord {
    pub amount: i64,
    pub asset_id: ObjectId,
}

/// History record from `get_account_history`: `op` is `[code, payload]`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    pub id: ObjectId,
    pub op: (u64, Value),
}
