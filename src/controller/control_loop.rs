//! The failover control loop.
//!
//! # Round
//! ```text
//! probe all members + proxy health (concurrently, joined)
//!     → publish snapshot
//!     → clear aggressive mode if the proxy reaches a primary
//!     → resolve primary
//!         split-brain / none  → log, no action
//!         new primary         → actuate, record on success
//!         same primary, proxy not reaching it → actuate again
//!     → wait for next tick (short while aggressive)
//! ```

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::broadcast;

use crate::cluster::{ConnInfo, ConnInfoError, Member, Role};
use crate::config::FailoverConfig;
use crate::controller::ticker::RoundTicker;
use crate::failover::{resolve, ConfigLink, FailoverActuator, LinkError, ProxyAdmin, Resolution};
use crate::health::{probe_round, RoleProbe};
use crate::observability::metrics;
use crate::status::{ClusterSnapshot, SharedPublisher};

const PROXY_HEALTH_NAME: &str = "proxy-health";

/// Errors that prevent the loop from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid connection string for {name}: {source}")]
    Descriptor {
        name: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("invalid proxy admin connection string: {0}")]
    ProxyDescriptor(#[source] ConnInfoError),

    #[error("no servers configured")]
    NoServers,

    #[error(transparent)]
    MissingArtifact(#[from] LinkError),

    #[error("shutdown requested before the proxy became reachable")]
    Interrupted,
}

/// What a round did about the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actuation {
    /// Nothing to do, or nothing safe to do.
    None,
    /// The proxy now points at this member.
    Succeeded(String),
    /// Actuation against this member stopped early.
    Failed(String),
}

/// Summary of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: u64,
    pub resolution: Resolution,
    pub actuation: Actuation,
}

/// Drives probe rounds and failover decisions.
pub struct ControlLoop {
    members: Vec<Member>,
    proxy_health: Member,
    probe: Arc<dyn RoleProbe>,
    admin: Arc<dyn ProxyAdmin>,
    actuator: FailoverActuator,
    publisher: SharedPublisher,
    current_primary: Option<String>,
    aggressive: bool,
    round: u64,
    timeout: Duration,
    interval: Duration,
    aggressive_interval: Duration,
    proxy_retry: Duration,
}

impl ControlLoop {
    /// Build members from configuration.
    ///
    /// Member descriptors are kept verbatim. Only the first member's is
    /// read, for the credentials the proxy health member borrows.
    pub fn new(
        config: &FailoverConfig,
        probe: Arc<dyn RoleProbe>,
        admin: Arc<dyn ProxyAdmin>,
        publisher: SharedPublisher,
    ) -> Result<Self, StartupError> {
        let members: Vec<Member> = config
            .servers
            .iter()
            .map(|(name, descriptor)| Member::new(name.clone(), descriptor.clone()))
            .collect();

        let first = members.first().ok_or(StartupError::NoServers)?;
        let credentials =
            tokio_postgres::Config::from_str(&first.descriptor).map_err(|source| StartupError::Descriptor {
                name: first.name.clone(),
                source,
            })?;
        let proxy_conninfo =
            ConnInfo::parse(&config.proxy.admin_connection).map_err(StartupError::ProxyDescriptor)?;
        let proxy_health = Member::new(
            PROXY_HEALTH_NAME,
            ConnInfo::passthrough(&proxy_conninfo, &credentials).to_string(),
        );

        let actuator = FailoverActuator::new(admin.clone(), ConfigLink::from_config(&config.proxy));

        Ok(Self {
            members,
            proxy_health,
            probe,
            admin,
            actuator,
            publisher,
            current_primary: None,
            aggressive: false,
            round: 0,
            timeout: config.probe_timeout(),
            interval: config.interval(),
            aggressive_interval: config.aggressive_interval(),
            proxy_retry: config.proxy_retry_delay(),
        })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn proxy_health(&self) -> &Member {
        &self.proxy_health
    }

    /// The member the proxy was last successfully pointed at.
    pub fn current_primary(&self) -> Option<&str> {
        self.current_primary.as_deref()
    }

    pub fn is_aggressive(&self) -> bool {
        self.aggressive
    }

    /// Verify artifacts, wait for the proxy, publish the unchecked snapshot.
    pub async fn startup(&mut self, shutdown: &mut broadcast::Receiver<()>) -> Result<(), StartupError> {
        self.actuator
            .link()
            .verify_artifacts(self.members.iter().map(|m| m.name.as_str()))?;
        if let Err(e) = self.actuator.link().check_replaceable() {
            tracing::warn!(
                error = %e,
                "Active configuration is not a symlink; failover will fail until it is replaced by one"
            );
        }

        loop {
            match self.admin.connect().await {
                Ok(_session) => break,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        retry_secs = self.proxy_retry.as_secs(),
                        "Could not connect to proxy"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(self.proxy_retry) => {}
                        _ = shutdown.recv() => return Err(StartupError::Interrupted),
                    }
                }
            }
        }

        tracing::info!(members = self.members.len(), "Connection to proxy validated, starting polling");
        self.publish();
        Ok(())
    }

    /// Run one probe round and act on it.
    pub async fn run_round(&mut self) -> RoundOutcome {
        let started = Instant::now();
        self.round += 1;

        probe_round(
            self.probe.as_ref(),
            &mut self.members,
            &mut self.proxy_health,
            self.timeout,
        )
        .await;

        for member in &self.members {
            metrics::record_member_role(&member.name, member.role());
        }
        metrics::record_round(started);

        // Observers see the round before anything is acted on.
        self.publish();

        let proxy_reaches_primary = self.proxy_health.role() == Role::Primary;
        if self.aggressive && proxy_reaches_primary {
            tracing::info!("Proxy confirmed pointing at a primary, leaving aggressive mode");
            self.set_aggressive(false);
        }

        let resolution = resolve(&self.members);
        let target = match &resolution {
            Resolution::SplitBrain(names) => {
                tracing::error!(
                    primaries = %names.join(", "),
                    "More than one primary! Not touching anything"
                );
                None
            }
            Resolution::NoPrimary => {
                tracing::warn!("No primary currently available! Not touching anything");
                None
            }
            Resolution::Primary(name) => match self.current_primary.as_deref() {
                Some(current) if current == name.as_str() => {
                    if proxy_reaches_primary {
                        None
                    } else {
                        tracing::warn!(
                            primary = %name,
                            proxy_role = %self.proxy_health.role(),
                            "Proxy not reaching the primary, reconfiguring again"
                        );
                        Some(name.clone())
                    }
                }
                Some(current) => {
                    tracing::info!(from = %current, to = %name, "Primary changed");
                    Some(name.clone())
                }
                None => {
                    tracing::info!(primary = %name, "Primary detected");
                    Some(name.clone())
                }
            },
        };

        let actuation = match target {
            Some(name) => self.actuate(name).await,
            None => Actuation::None,
        };

        RoundOutcome {
            round: self.round,
            resolution,
            actuation,
        }
    }

    /// Start up, then run rounds until shutdown.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        self.startup(&mut shutdown).await?;

        let mut ticker = RoundTicker::new(self.interval, self.aggressive_interval);
        loop {
            self.run_round().await;

            tokio::select! {
                _ = ticker.tick(self.aggressive) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Control loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn actuate(&mut self, name: String) -> Actuation {
        match self.actuator.activate(&name).await {
            Ok(()) => {
                metrics::record_failover(&name, true);
                self.current_primary = Some(name.clone());
                // Re-verify quickly until the proxy health probe confirms it.
                self.set_aggressive(true);
                Actuation::Succeeded(name)
            }
            Err(e) => {
                tracing::error!(member = %name, error = %e, "Failover actuation failed");
                metrics::record_failover(&name, false);
                Actuation::Failed(name)
            }
        }
    }

    fn set_aggressive(&mut self, active: bool) {
        self.aggressive = active;
        metrics::record_aggressive_mode(active);
    }

    fn publish(&self) {
        self.publisher.publish(ClusterSnapshot::capture(
            self.round,
            &self.members,
            &self.proxy_health,
        ));
    }
}
