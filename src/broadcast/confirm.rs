//! Confirmation channel for submitted transactions.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;
use tokio::sync::oneshot;

use crate::broadcast::transaction::{PendingTransaction, TransactionRef};
use crate::node::NodeRpc;

/// Terminal notification for a submitted transaction.
///
/// `tx_ref == None` is the global error signal delivered to every
/// registered transaction. Not persisted anywhere.
#[derive(Debug, Clone)]
pub struct ConfirmationEvent {
    pub tx_ref: Option<TransactionRef>,
    pub error: Option<String>,
    pub broadcast: bool,
}

/// Shared publish point for confirmation outcomes.
///
/// Each submitted transaction registers a oneshot channel keyed by its
/// reference; dispatch is by reference equality, never by subscription
/// order, so concurrently in-flight broadcasts cannot cross-resolve.
/// The registration is removed when its event is delivered.
pub struct ConfirmationHub {
    node: Arc<dyn NodeRpc>,
    listeners: DashMap<TransactionRef, oneshot::Sender<ConfirmationEvent>>,
}

impl ConfirmationHub {
    pub fn new(node: Arc<dyn NodeRpc>) -> Self {
        Self {
            node,
            listeners: DashMap::new(),
        }
    }

    /// Register the listener for one transaction.
    ///
    /// At most one listener per transaction; a stale registration for
    /// the same reference is replaced.
    pub fn register(&self, tx_ref: TransactionRef) -> oneshot::Receiver<ConfirmationEvent> {
        let (tx, rx) = oneshot::channel();
        self.listeners.insert(tx_ref, tx);
        rx
    }

    /// Drop a registration without delivering anything.
    pub fn deregister(&self, tx_ref: TransactionRef) {
        self.listeners.remove(&tx_ref);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to the transaction it references.
    ///
    /// Non-terminal events (no error, not broadcast) are ignored; the
    /// listener stays registered for the terminal one. Events for
    /// unregistered references are dropped.
    pub fn publish(&self, event: ConfirmationEvent) {
        if event.error.is_none() && !event.broadcast {
            tracing::trace!("Ignoring non-terminal confirmation event");
            return;
        }

        match event.tx_ref {
            Some(tx_ref) => {
                if let Some((_, listener)) = self.listeners.remove(&tx_ref) {
                    let _ = listener.send(event);
                } else {
                    tracing::debug!(tx_ref = %tx_ref, "No listener for confirmation event");
                }
            }
            None => {
                // Global error signal: fan out to everything in flight
                let refs: Vec<TransactionRef> =
                    self.listeners.iter().map(|entry| *entry.key()).collect();
                for tx_ref in refs {
                    if let Some((_, listener)) = self.listeners.remove(&tx_ref) {
                        let _ = listener.send(event.clone());
                    }
                }
            }
        }
    }

    /// Hand a signed transaction to the node.
    ///
    /// The submission runs in the background; its outcome is published
    /// on this hub, so the caller's listener must already be registered.
    pub fn submit(self: &Arc<Self>, tx: &PendingTransaction) {
        let hub = Arc::clone(self);
        let tx_ref = tx.tx_ref();
        let wire = tx.wire();
        let operations = tx.operations().len();
        tokio::spawn(async move {
            tracing::info!(tx_ref = %tx_ref, operations = operations, "Submitting transaction");
            let event = match hub.node.call("broadcast_transaction", json!([wire])).await {
                Ok(_) => ConfirmationEvent {
                    tx_ref: Some(tx_ref),
                    error: None,
                    broadcast: true,
                },
                Err(e) => ConfirmationEvent {
                    tx_ref: Some(tx_ref),
                    error: Some(e.to_string()),
                    broadcast: false,
                },
            };
            hub.publish(event);
        });
    }
}
