//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs + controller):
//!     Load config → logging → pidfile → verify artifacts
//!     → wait for proxy → status server + control loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → control loop stops between rounds
//!     → status server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast on deployment errors (missing configuration artifacts)
//! - An actuation in progress is never interrupted by shutdown

pub mod pidfile;
pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
