//! Query subsystem: read paths against the remote node.
//!
//! # Data Flow
//! ```text
//! Caller (local RPC method, broadcast path)
//!     → facade.rs (one method per read capability)
//!     → resolver.rs (name → canonical id, fast path for ids)
//!     → paging.rs (page until a short page, dedupe)
//!     → fees.rs (batch fee computation, positional re-attach)
//!     → node (single shared NodeRpc handle)
//! ```
//!
//! # Design Decisions
//! - Facade methods are stateless and independently concurrent
//! - Pages within one aggregation are sequential; the next bound comes
//!   from the previous page's last element
//! - Failures abort the enclosing aggregate; no partial lists escape

pub mod facade;
pub mod fees;
pub mod paging;
pub mod resolver;
pub mod types;

pub use facade::{QueryFacade, PAGE_SIZE};
pub use fees::FeeInjector;
pub use resolver::IdentifierResolver;
pub use types::{Asset, Balance, HistoryEntry, ObjectId, Operation};
