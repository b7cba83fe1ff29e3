//! Failover actuation.
//!
//! # Sequence
//! ```text
//! connect to proxy admin ──fail──▶ abort, filesystem untouched
//!     │
//! repoint config link ─────fail──▶ abort, no reload
//!     │
//! RELOAD over the same session ──fail──▶ abort (link already moved)
//!     │
//! Ok: caller records the new current primary
//! ```
//!
//! The sequence always runs to completion or to its first failure; nothing
//! interrupts it midway.

use std::sync::Arc;

use thiserror::Error;

use crate::failover::admin::{AdminError, ProxyAdmin};
use crate::failover::link::{ConfigLink, LinkError};

/// Why an actuation stopped early.
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("proxy admin unreachable: {0}")]
    ProxyUnreachable(#[source] AdminError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("failed to reload proxy: {0}")]
    Reload(#[source] AdminError),
}

/// Repoints the proxy at a member and makes it reload.
pub struct FailoverActuator {
    admin: Arc<dyn ProxyAdmin>,
    link: ConfigLink,
}

impl FailoverActuator {
    pub fn new(admin: Arc<dyn ProxyAdmin>, link: ConfigLink) -> Self {
        Self { admin, link }
    }

    pub fn link(&self) -> &ConfigLink {
        &self.link
    }

    /// Make `member` the proxy's active backend.
    pub async fn activate(&self, member: &str) -> Result<(), ActuationError> {
        let mut session = self
            .admin
            .connect()
            .await
            .map_err(ActuationError::ProxyUnreachable)?;

        self.link.repoint(member)?;

        session.reload().await.map_err(ActuationError::Reload)?;

        tracing::info!(member = %member, "Proxy reconfigured for new primary");
        Ok(())
    }
}
