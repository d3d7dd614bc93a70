//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and middleware produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every request log line
//! - Metrics are cheap and safe to record without an exporter

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
