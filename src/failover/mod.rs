//! Failover subsystem.
//!
//! # Data Flow
//! ```text
//! Completed probe round
//!     → resolver.rs (unique primary? split-brain? none?)
//!     → control loop compares with the current primary
//!     → actuator.rs on change or unconfirmed reload:
//!         admin.rs (open proxy admin session)
//!         link.rs  (repoint active-configuration symlink)
//!         admin.rs (RELOAD)
//! ```
//!
//! # Design Decisions
//! - Never guess during split-brain: no action at all
//! - Configuration variants are pre-built; we only choose between them
//! - Actuation short-circuits on the first failure and is retried next round

pub mod actuator;
pub mod admin;
pub mod link;
pub mod resolver;

pub use actuator::{ActuationError, FailoverActuator};
pub use admin::{AdminError, AdminSession, PgBouncerAdmin, ProxyAdmin};
pub use link::{ConfigLink, LinkError};
pub use resolver::{resolve, Resolution};
