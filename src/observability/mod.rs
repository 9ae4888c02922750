//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters for node calls, RPC requests, broadcasts)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable via env or config
//! - Metrics are cheap (atomic increments) and labeled by method/outcome
//! - Metrics exposition is optional and off by default

pub mod logging;
pub mod metrics;
