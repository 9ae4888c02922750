//! Broadcast lifecycle coordination.
//!
//! # Responsibilities
//! - Drive unlock → build → submit → await confirmation for one call
//! - Register the confirmation listener before submission
//! - Deliver exactly one terminal outcome per call
//!
//! # Design Decisions
//! - One-shot per call: no internal retry; a caller wanting retry
//!   invokes broadcast again with a fresh operation set
//! - An abandoned result future leaves its registration until a
//!   terminal event arrives

use std::sync::Arc;

use crate::broadcast::confirm::ConfirmationHub;
use crate::broadcast::transaction::{PendingTransaction, TransactionRef, TransactionState};
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics;
use crate::query::Operation;
use crate::wallet::SigningService;

/// Drives one transaction from operations to a terminal outcome.
pub struct BroadcastCoordinator {
    signer: Arc<dyn SigningService>,
    hub: Arc<ConfirmationHub>,
}

impl BroadcastCoordinator {
    pub fn new(signer: Arc<dyn SigningService>, hub: Arc<ConfirmationHub>) -> Self {
        Self { signer, hub }
    }

    /// Broadcast a batch of operations as one transaction.
    ///
    /// Resolves with the transaction's reference once the confirmation
    /// channel reports a successful broadcast; fails with the reported
    /// error otherwise. Never submits while the signing service stays
    /// locked.
    pub async fn broadcast(&self, operations: Vec<Operation>) -> GatewayResult<TransactionRef> {
        if !self.signer.is_unlocked() {
            if let Err(e) = self.signer.unlock().await {
                tracing::warn!(error = %e, "Broadcast refused: signing service locked");
                metrics::record_broadcast("auth_required");
                return Err(GatewayError::AuthRequired);
            }
        }

        let mut tx = PendingTransaction::new();
        for operation in operations {
            tx.push_operation(operation);
        }
        self.signer.process_transaction(&mut tx).await?;

        // Registration happens before the submission is issued, so the
        // outcome cannot slip past the listener.
        let confirmation = self.hub.register(tx.tx_ref());
        tx.set_state(TransactionState::Submitted);
        self.hub.submit(&tx);

        match confirmation.await {
            Ok(event) => {
                if let Some(error) = event.error {
                    tx.set_state(TransactionState::Failed);
                    metrics::record_broadcast("failed");
                    Err(GatewayError::BroadcastFailed(error))
                } else {
                    tx.set_state(TransactionState::Confirmed);
                    metrics::record_broadcast("confirmed");
                    Ok(tx.tx_ref())
                }
            }
            Err(_) => {
                self.hub.deregister(tx.tx_ref());
                tx.set_state(TransactionState::Failed);
                metrics::record_broadcast("failed");
                Err(GatewayError::BroadcastFailed(
                    "confirmation channel closed".to_string(),
                ))
            }
        }
    }
}
