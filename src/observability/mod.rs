//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the fetch/rewrite layers produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every handler log line
//! - Metrics are recorded even when no exporter is installed (no-op recorder)

pub mod logging;
pub mod metrics;
