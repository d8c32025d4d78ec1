//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Application::handle
//!     → logging.rs (structured log events, tracing subscriber setup)
//!     → metrics.rs (dispatch counters and latency histograms)
//!
//! Consumers:
//!     → stdout (plain or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID comes from the HTTP layer and is attached to the trace span
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
