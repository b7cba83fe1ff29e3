//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Probe or admin action
//!     → postgres.rs (connect with timeout, spawn driver)
//!     → single statement over the simple query protocol
//!     → guard dropped → socket closed
//! ```
//!
//! # Design Decisions
//! - Connections never outlive the operation that opened them
//! - Rounds repeat forever, so nothing may leak across them

pub mod postgres;

pub use postgres::PgConnection;
