//! Broadcast subsystem: transaction submission and confirmation.
//!
//! # Data Flow
//! ```text
//! broadcast(operations)
//!     → coordinator.rs (unlock → build → submit → await outcome)
//!     → transaction.rs (pending transaction, per-call ownership)
//!     → confirm.rs (per-transaction listener registry, publish point)
//!     → node (broadcast_transaction)
//! ```
//!
//! # Design Decisions
//! - Each broadcast call owns its transaction and its listener
//! - Dispatch is by transaction reference, never subscription order
//! - Listener registration happens before submission; deregistration on
//!   every terminal path

pub mod confirm;
pub mod coordinator;
pub mod transaction;

pub use confirm::{ConfirmationEvent, ConfirmationHub};
pub use coordinator::BroadcastCoordinator;
pub use transaction::{PendingTransaction, TransactionRef, TransactionState};
