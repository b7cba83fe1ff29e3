//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! failover controller. All types derive Serde traits for deserialization
//! from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the failover controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Polling cadence and probe timeouts.
    pub controller: ControllerConfig,

    /// Proxy admin access and the active-configuration link.
    pub proxy: ProxyConfig,

    /// Cluster members: name -> libpq connection descriptor.
    pub servers: BTreeMap<String, String>,

    /// Status HTTP surface.
    pub status: StatusConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl FailoverConfig {
    /// Normal interval between probe rounds.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.controller.interval_secs)
    }

    /// Interval between rounds while a failover is being confirmed.
    pub fn aggressive_interval(&self) -> Duration {
        Duration::from_millis(self.controller.aggressive_interval_ms)
    }

    /// Total time budget of one probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.controller.timeout_secs)
    }

    /// Connection-establishment timeout, one second short of the probe budget.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.controller.timeout_secs.saturating_sub(1).max(1))
    }

    /// Delay between attempts to reach the proxy at startup.
    pub fn proxy_retry_delay(&self) -> Duration {
        Duration::from_secs(self.controller.proxy_retry_secs)
    }
}

/// Control loop timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Seconds between probe rounds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Round interval in milliseconds while aggressive recheck mode is on.
    pub aggressive_interval_ms: u64,

    /// Back-off in seconds between startup attempts to reach the proxy.
    pub proxy_retry_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 3,
            aggressive_interval_ms: 100,
            proxy_retry_secs: 5,
        }
    }
}

/// Proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Connection descriptor for the proxy's admin console.
    pub admin_connection: String,

    /// Path of the active-configuration symlink read by the proxy.
    pub config_link: PathBuf,

    /// Directory holding one pre-built configuration file per member.
    pub config_dir: PathBuf,

    /// Extension of the pre-built configuration files.
    pub artifact_extension: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            admin_connection: String::new(),
            config_link: PathBuf::new(),
            config_dir: PathBuf::new(),
            artifact_extension: "ini".to_string(),
        }
    }
}

/// Status surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Serve the status endpoints.
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:7100").
    pub bind_address: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:7100".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9187".to_string(),
        }
    }
}
