//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bouncer_member_role` (gauge): 0=down, 1=standby, 2=primary, by member
//! - `bouncer_failovers_total` (counter): actuations by member and outcome
//! - `bouncer_round_duration_seconds` (histogram): probe round latency
//! - `bouncer_aggressive_mode` (gauge): 1 while a failover is unconfirmed
//!
//! Recording is a no-op until a recorder is installed, so the control loop
//! records unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::cluster::Role;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_member_role(member: &str, role: Role) {
    gauge!("bouncer_member_role", "member" => member.to_string()).set(role.as_gauge());
}

pub fn record_failover(member: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "bouncer_failovers_total",
        "member" => member.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_round(started: Instant) {
    histogram!("bouncer_round_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_aggressive_mode(active: bool) {
    gauge!("bouncer_aggressive_mode").set(if active { 1.0 } else { 0.0 });
}
