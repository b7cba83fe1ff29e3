//! Cluster data model.
//!
//! # Data Flow
//! ```text
//! [servers] config table
//!     → member.rs (Member per server, descriptor kept verbatim)
//!     → updated by probe rounds, published as MemberState
//!
//! proxy admin_connection + first server's credentials
//!     → conninfo.rs passthrough
//!     → member.rs (proxy health Member)
//! ```
//!
//! # Design Decisions
//! - Members are created once at startup and never added or removed
//! - Roles are memoryless: each round's probe result replaces the last
//! - Only the control loop mutates members
//! - Member descriptors are the driver's business; any form it accepts works

pub mod conninfo;
pub mod member;

pub use conninfo::{ConnInfo, ConnInfoError};
pub use member::{Member, MemberState, Role};
