//! Control loop subsystem.
//!
//! # Data Flow
//! ```text
//! startup: verify artifacts → wait for proxy → publish unchecked snapshot
//!
//! every tick (ticker.rs):
//!     control_loop.rs run_round()
//!         → health::probe_round
//!         → status::SnapshotPublisher::publish
//!         → failover::resolve
//!         → failover::FailoverActuator::activate (on change / self-heal)
//! ```
//!
//! # Design Decisions
//! - One long-lived task owns all members; no shared mutable state
//! - Rounds are strictly sequential; actuation finishes before the next
//!   round's probes start
//! - The current primary changes only after a successful actuation

pub mod control_loop;
pub mod ticker;

pub use control_loop::{Actuation, ControlLoop, RoundOutcome, StartupError};
pub use ticker::RoundTicker;
