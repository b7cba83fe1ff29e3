//! Failover controller for a connection-pooling proxy in front of a
//! primary/standby PostgreSQL cluster.

pub mod cluster;
pub mod config;
pub mod controller;
pub mod failover;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod status;

pub use config::FailoverConfig;
pub use controller::ControlLoop;
pub use lifecycle::Shutdown;
pub use status::SnapshotPublisher;
