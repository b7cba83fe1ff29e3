//! bouncer-failover daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌──────────────────────────────────────────────────────┐
//!                │                  bouncer-failover                     │
//!                │                                                       │
//!  primary  ◀────┼── probe ──┐                                           │
//!  standby  ◀────┼── probe ──┼─▶ control loop ──▶ snapshot ──▶ status   ◀┼──── monitoring
//!  standby  ◀────┼── probe ──┤        │            publisher    server   │
//!  proxy    ◀────┼── probe ──┘        │                                  │
//!  (passthrough) │                    ▼                                  │
//!                │              failover actuator                        │
//!  proxy admin ◀─┼──── RELOAD ────────┤                                  │
//!  config link ◀─┼──── symlink ───────┘                                  │
//!                └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use bouncer_failover::config::load_config;
use bouncer_failover::controller::{ControlLoop, StartupError};
use bouncer_failover::failover::PgBouncerAdmin;
use bouncer_failover::health::PostgresProbe;
use bouncer_failover::lifecycle::{pidfile, signals, Shutdown};
use bouncer_failover::observability::{logging, metrics};
use bouncer_failover::status::{server, SnapshotPublisher, StatusState};

#[derive(Parser)]
#[command(name = "bouncer-failover")]
#[command(about = "Repoints a connection pooler at the current PostgreSQL primary", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "bouncer-failover.toml")]
    config: PathBuf,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Status server address, overriding the configuration.
    #[arg(long)]
    http: Option<String>,

    /// Append the process id to this file.
    #[arg(long)]
    pidfile: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(http) = cli.http {
        config.status.bind_address = http;
    }

    logging::init_logging(&config.observability.log_level, cli.logfile.as_deref())?;

    if let Some(path) = &cli.pidfile {
        pidfile::write_pidfile(path)?;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        servers = config.servers.len(),
        interval_secs = config.controller.interval_secs,
        timeout_secs = config.controller.timeout_secs,
        "bouncer-failover starting up"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let publisher = Arc::new(SnapshotPublisher::new());
    let admin = PgBouncerAdmin::new(config.proxy.admin_connection.clone(), config.connect_timeout());
    let probe = PostgresProbe::new(config.connect_timeout());
    let control_loop = ControlLoop::new(&config, Arc::new(probe), Arc::new(admin), publisher.clone())?;

    let status_task = if config.status.enabled {
        let listener = TcpListener::bind(&config.status.bind_address).await?;
        let state = StatusState {
            publisher,
            interval: config.interval(),
        };
        Some(tokio::spawn(server::serve(listener, state, shutdown.subscribe())))
    } else {
        None
    };

    let result = control_loop.run(shutdown.subscribe()).await;

    // Whatever ended the loop, take the status server down with it.
    shutdown.trigger();
    if let Some(task) = status_task {
        match task.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Status server failed"),
            Err(e) => tracing::error!(error = %e, "Status server task panicked"),
            Ok(Ok(())) => {}
        }
    }

    match result {
        Ok(()) | Err(StartupError::Interrupted) => {
            tracing::info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            Err(e.into())
        }
    }
}
