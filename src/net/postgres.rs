//! Short-lived PostgreSQL protocol connections.
//!
//! # Responsibilities
//! - Open a connection with a bounded connect timeout
//! - Drive the connection on a background task
//! - Guarantee the socket is released on every exit path
//!
//! # Design Decisions
//! - No pooling: every probe and admin action opens a fresh connection
//! - Plain TCP/Unix sockets only (NoTls)
//! - The driver task is aborted when the guard drops, including when the
//!   owning future is cancelled by a timeout

use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};

/// An open connection. Dropping it closes the socket.
pub struct PgConnection {
    client: Client,
    driver: JoinHandle<()>,
}

impl PgConnection {
    /// Connect using a keyword/value or URI `descriptor`, giving up after
    /// `connect_timeout`.
    pub async fn open(descriptor: &str, connect_timeout: Duration) -> Result<Self, tokio_postgres::Error> {
        let mut config = Config::from_str(descriptor)?;
        config.connect_timeout(connect_timeout);

        let (client, connection) = config.connect(NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "Connection closed with error");
            }
        });

        Ok(Self { client, driver })
    }

    /// Run one statement with the simple query protocol and return the
    /// first column of the first row, if any.
    ///
    /// The simple protocol keeps this usable through a transaction-pooling
    /// proxy and against the proxy's admin console.
    pub async fn first_value(&self, sql: &str) -> Result<Option<String>, tokio_postgres::Error> {
        let messages = self.client.simple_query(sql).await?;
        let value = messages.into_iter().find_map(|message| match message {
            tokio_postgres::SimpleQueryMessage::Row(row) => Some(row.get(0).map(str::to_owned)),
            _ => None,
        });
        Ok(value.flatten())
    }
}

impl Deref for PgConnection {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for PgConnection {
    fn drop(&mut self) {
        self.driver.abort();
    }
}
