//! Wallet subsystem: keys, local accounts, signing.
//!
//! # Data Flow
//! ```text
//! Environment variables (per-account private keys)
//!     → keystore.rs (key loading, lock state, digest + sign)
//!     → signing.rs (JSON payload signing flow)
//!     → accounts.rs (local account list with readiness signal)
//! ```
//!
//! # Security Constraints
//! - Private keys come only from environment variables
//! - Keys are never logged or serialized
//! - Signing requires the store to be unlocked

use async_trait::async_trait;

use crate::broadcast::transaction::PendingTransaction;
use crate::error::GatewayResult;

pub mod accounts;
pub mod keystore;
pub mod signing;

pub use accounts::AccountStore;
pub use keystore::KeyStore;

/// The local signing collaborator consumed by the broadcast path.
#[async_trait]
pub trait SigningService: Send + Sync {
    /// Whether signing is currently possible.
    fn is_unlocked(&self) -> bool;

    /// Make signing possible, or fail with `AuthRequired`.
    async fn unlock(&self) -> GatewayResult<()>;

    /// Validate and locally sign a built transaction.
    async fn process_transaction(&self, tx: &mut PendingTransaction) -> GatewayResult<()>;
}
