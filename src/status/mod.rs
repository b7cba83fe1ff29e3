//! Status subsystem.
//!
//! # Data Flow
//! ```text
//! Control loop (single writer)
//!     → snapshot.rs publish(ClusterSnapshot)   [ArcSwap store]
//!
//! HTTP readers (many)
//!     → server.rs handler
//!     → snapshot.rs fetch()                    [ArcSwap load]
//!     → report.rs render / classify
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable and replaced wholesale
//! - Readers never wait on a round in progress
//! - The status surface is read-only

pub mod report;
pub mod server;
pub mod snapshot;

pub use report::{HealthLevel, HealthReport};
pub use server::{status_router, StatusState};
pub use snapshot::{ClusterSnapshot, SharedPublisher, SnapshotPublisher};
