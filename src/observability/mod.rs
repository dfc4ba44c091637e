//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway + upstream client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows into every log line of a request
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
