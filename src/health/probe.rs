//! Role probes.
//!
//! # Responsibilities
//! - Connect to one endpoint and ask whether it is in recovery
//! - Map the answer to a [`Role`]
//!
//! # Design Decisions
//! - Probes have no timeout of their own beyond the connect timeout; the
//!   caller races them against the per-check budget
//! - Errors carry only a message; callers only log them

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cluster::Role;
use crate::net::PgConnection;

const RECOVERY_QUERY: &str = "SELECT pg_is_in_recovery()";

/// Failure of a single probe. Always treated as [`Role::Down`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("failed to open connection: {0}")]
    Connect(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("unexpected pg_is_in_recovery() result: {0:?}")]
    UnexpectedResult(Option<String>),
}

/// Checks the role of one endpoint.
#[async_trait]
pub trait RoleProbe: Send + Sync {
    async fn check(&self, descriptor: &str) -> Result<Role, ProbeError>;
}

/// Probe speaking the PostgreSQL protocol.
#[derive(Debug, Clone)]
pub struct PostgresProbe {
    connect_timeout: Duration,
}

impl PostgresProbe {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl RoleProbe for PostgresProbe {
    async fn check(&self, descriptor: &str) -> Result<Role, ProbeError> {
        let conn = PgConnection::open(descriptor, self.connect_timeout)
            .await
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        let value = conn
            .first_value(RECOVERY_QUERY)
            .await
            .map_err(|e| ProbeError::Query(e.to_string()))?;

        parse_recovery(value)
    }
}

fn parse_recovery(value: Option<String>) -> Result<Role, ProbeError> {
    match value.as_deref() {
        Some("t") | Some("true") => Ok(Role::from_recovery(true)),
        Some("f") | Some("false") => Ok(Role::from_recovery(false)),
        _ => Err(ProbeError::UnexpectedResult(value)),
    }
}
