//! Proxy admin console access.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::net::PgConnection;

/// Errors talking to the proxy's admin console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("could not connect: {0}")]
    Connect(String),

    #[error("command failed: {0}")]
    Command(String),
}

/// Opens admin sessions on the proxy.
#[async_trait]
pub trait ProxyAdmin: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn AdminSession>, AdminError>;
}

/// An open admin session.
#[async_trait]
pub trait AdminSession: Send {
    /// Make the proxy re-read its configuration.
    async fn reload(&mut self) -> Result<(), AdminError>;
}

/// PgBouncer admin console (the virtual `pgbouncer` database).
#[derive(Debug, Clone)]
pub struct PgBouncerAdmin {
    descriptor: String,
    connect_timeout: Duration,
}

impl PgBouncerAdmin {
    pub fn new(descriptor: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            descriptor: descriptor.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl ProxyAdmin for PgBouncerAdmin {
    async fn connect(&self) -> Result<Box<dyn AdminSession>, AdminError> {
        let conn = PgConnection::open(&self.descriptor, self.connect_timeout)
            .await
            .map_err(|e| AdminError::Connect(e.to_string()))?;
        Ok(Box::new(PgBouncerSession { conn }))
    }
}

struct PgBouncerSession {
    conn: PgConnection,
}

#[async_trait]
impl AdminSession for PgBouncerSession {
    async fn reload(&mut self) -> Result<(), AdminError> {
        self.conn
            .simple_query("RELOAD")
            .await
            .map_err(|e| AdminError::Command(e.to_string()))?;
        Ok(())
    }
}
