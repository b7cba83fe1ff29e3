//! Shared fakes for control loop integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bouncer_failover::cluster::Role;
use bouncer_failover::config::FailoverConfig;
use bouncer_failover::controller::ControlLoop;
use bouncer_failover::failover::{AdminError, AdminSession, ConfigLink, ProxyAdmin};
use bouncer_failover::health::{ProbeError, RoleProbe};
use bouncer_failover::status::SnapshotPublisher;
use tokio_postgres::config::Host;

/// Host used by the proxy's descriptor; the proxy health probe targets it.
pub const PROXY_HOST: &str = "proxy";

/// First host named by a keyword/value or URI descriptor.
pub fn host_of(descriptor: &str) -> String {
    let config: tokio_postgres::Config = match descriptor.parse() {
        Ok(config) => config,
        Err(_) => return String::new(),
    };
    match config.get_hosts().first() {
        Some(Host::Tcp(host)) => host.clone(),
        Some(Host::Unix(path)) => path.display().to_string(),
        None => String::new(),
    }
}

/// Probe answering from a mutable table keyed by the descriptor's `host`.
///
/// Hosts missing from the table answer like an unreachable server.
#[derive(Default)]
pub struct ScriptedProbe {
    roles: Mutex<HashMap<String, Role>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl ScriptedProbe {
    pub fn set(&self, host: &str, role: Role) {
        self.roles.lock().unwrap().insert(host.to_string(), role);
    }

    pub fn set_all(&self, roles: &[(&str, Role)]) {
        for (host, role) in roles {
            self.set(host, *role);
        }
    }

    pub fn delay(&self, host: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(host.to_string(), delay);
    }
}

#[async_trait]
impl RoleProbe for ScriptedProbe {
    async fn check(&self, descriptor: &str) -> Result<Role, ProbeError> {
        let host = host_of(descriptor);
        let delay = self.delays.lock().unwrap().get(&host).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let role = self.roles.lock().unwrap().get(&host).copied();
        role.ok_or_else(|| ProbeError::Connect(format!("{}: connection refused", host)))
    }
}

/// Proxy admin counting connections and reloads.
#[derive(Default)]
pub struct FakeAdmin {
    pub unreachable: AtomicBool,
    pub reload_fails: Arc<AtomicBool>,
    pub connects: AtomicUsize,
    pub reloads: Arc<AtomicUsize>,
}

impl FakeAdmin {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

struct FakeSession {
    reload_fails: Arc<AtomicBool>,
    reloads: Arc<AtomicUsize>,
}

#[async_trait]
impl ProxyAdmin for FakeAdmin {
    async fn connect(&self) -> Result<Box<dyn AdminSession>, AdminError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AdminError::Connect("connection refused".into()));
        }
        Ok(Box::new(FakeSession {
            reload_fails: self.reload_fails.clone(),
            reloads: self.reloads.clone(),
        }))
    }
}

#[async_trait]
impl AdminSession for FakeSession {
    async fn reload(&mut self) -> Result<(), AdminError> {
        if self.reload_fails.load(Ordering::SeqCst) {
            return Err(AdminError::Command("RELOAD failed".into()));
        }
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A temp directory with one artifact per member and a config pointing at it.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub config: FailoverConfig,
    pub probe: Arc<ScriptedProbe>,
    pub admin: Arc<FakeAdmin>,
    pub publisher: Arc<SnapshotPublisher>,
}

impl Harness {
    pub fn new(members: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let variants = dir.path().join("variants");
        fs::create_dir(&variants).unwrap();

        let mut config = FailoverConfig::default();
        config.proxy.admin_connection = format!("host={} port=6432 user=admin dbname=pgbouncer", PROXY_HOST);
        config.proxy.config_link = dir.path().join("pgbouncer.ini");
        config.proxy.config_dir = variants.clone();
        config.controller.timeout_secs = 1;
        config.controller.proxy_retry_secs = 5;

        for name in members {
            fs::write(variants.join(format!("{}.ini", name)), format!("; backend {}\n", name)).unwrap();
            config
                .servers
                .insert(name.to_string(), format!("host={} user=app dbname=app", name));
        }

        Self {
            dir,
            config,
            probe: Arc::new(ScriptedProbe::default()),
            admin: Arc::new(FakeAdmin::default()),
            publisher: Arc::new(SnapshotPublisher::new()),
        }
    }

    pub fn control_loop(&self) -> ControlLoop {
        ControlLoop::new(
            &self.config,
            self.probe.clone(),
            self.admin.clone(),
            self.publisher.clone(),
        )
        .unwrap()
    }

    pub fn link(&self) -> ConfigLink {
        ConfigLink::from_config(&self.config.proxy)
    }

    pub fn link_target(&self) -> Option<PathBuf> {
        self.link().current_target().unwrap()
    }

    pub fn artifact(&self, name: &str) -> PathBuf {
        self.link().artifact_for(name)
    }
}
