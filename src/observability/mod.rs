//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Control loop, probes, actuator produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (role gauges, failover counters, round latency)
//!
//! Consumers:
//!     → Log file or stderr
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every failure that is handled locally is still logged where it happens
//! - Metrics are cheap and recorded whether or not an exporter is installed

pub mod logging;
pub mod metrics;
