//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Probe round (active.rs):
//!     Control loop tick
//!     → one probe per member + one through the proxy, concurrently
//!     → each raced against the per-check timeout
//!     → result recorded on its Member
//!
//! Probe (probe.rs):
//!     connect → SELECT pg_is_in_recovery() → Standby | Primary
//!     any failure → Down
//! ```
//!
//! # Design Decisions
//! - Probe failure is steady-state behaviour, never a hard error
//! - A round completes only when every probe has resolved
//! - No retries inside a round; the next round retries naturally

pub mod active;
pub mod probe;

pub use active::{probe_member, probe_round};
pub use probe::{PostgresProbe, ProbeError, RoleProbe};
