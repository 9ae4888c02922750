//! Pending transaction aggregate.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::query::Operation;

/// Reference identifying one in-flight transaction.
///
/// Listener identity on the confirmation channel is scoped to this
/// reference, so concurrent broadcasts never observe each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionRef(Uuid);

impl TransactionRef {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

impl Serialize for TransactionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TransactionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let raw = text.strip_prefix("tx-").unwrap_or(&text);
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Lifecycle of a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Building,
    Submitted,
    Confirmed,
    Failed,
}

/// A transaction under construction and submission.
///
/// Owned exclusively by one broadcast call; never shared across
/// concurrent broadcasts.
#[derive(Debug)]
pub struct PendingTransaction {
    tx_ref: TransactionRef,
    operations: Vec<Operation>,
    signatures: Vec<String>,
    state: TransactionState,
}

impl PendingTransaction {
    pub fn new() -> Self {
        Self {
            tx_ref: TransactionRef::new(),
            operations: Vec::new(),
            signatures: Vec::new(),
            state: TransactionState::Building,
        }
    }

    pub fn tx_ref(&self) -> TransactionRef {
        self.tx_ref
    }

    /// Append an operation. Order is significant: the ledger applies
    /// operations in sequence.
    pub fn push_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn signatures(&self) -> &[String] {
        &self.signatures
    }

    pub fn set_signatures(&mut self, signatures: Vec<String>) {
        self.signatures = signatures;
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn set_state(&mut self, state: TransactionState) {
        tracing::debug!(tx_ref = %self.tx_ref, state = ?state, "Transaction state");
        self.state = state;
    }

    /// The operations in wire shape: `[[code, payload], ...]`.
    pub fn operations_wire(&self) -> Vec<Value> {
        self.operations
            .iter()
            .map(|operation| json!([operation.code, operation.op]))
            .collect()
    }

    /// Bytes covered by the local signatures.
    pub fn signing_payload(&self) -> GatewayResult<Vec<u8>> {
        serde_json::to_vec(&self.operations_wire())
            .map_err(|e| GatewayError::InvalidInput(format!("unserializable operation: {}", e)))
    }

    /// Full wire shape handed to the node for broadcast.
    pub fn wire(&self) -> Value {
        json!({
            "ref": self.tx_ref,
            "operations": self.operations_wire(),
            "signatures": self.signatures,
        })
    }
}

impl Default for PendingTransaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_are_unique() {
        assert_ne!(
            PendingTransaction::new().tx_ref(),
            PendingTransaction::new().tx_ref()
        );
    }

    #[test]
    fn test_operations_keep_input_order() {
        let mut tx = PendingTransaction::new();
        for n in 0..3u64 {
            tx.push_operation(Operation {
                code: n,
                op: json!({"n": n}),
            });
        }
        let wire = tx.operations_wire();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0][0], 0);
        assert_eq!(wire[2][1]["n"], 2);
    }

    #[test]
    fn test_wire_carries_signatures() {
        let mut tx = PendingTransaction::new();
        tx.push_operation(Operation {
            code: 0,
            op: json!({}),
        });
        tx.set_signatures(vec!["ab".repeat(64)]);
        let wire = tx.wire();
        assert_eq!(wire["signatures"].as_array().unwrap().len(), 1);
        assert!(wire["ref"].is_string());
    }
}
