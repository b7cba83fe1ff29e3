//! Cluster snapshot exchange.
//!
//! One writer (the control loop) replaces the whole snapshot after every
//! round; any number of readers fetch the latest one without blocking.
//! Members are never exposed individually, so a reader cannot observe a
//! half-updated round.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cluster::{Member, MemberState};

/// Member states at the end of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSnapshot {
    /// Round counter; 0 for the initial unchecked snapshot.
    pub round: u64,
    /// When the snapshot was published. `None` before the first publish.
    pub published_at: Option<DateTime<Utc>>,
    /// Cluster members in configuration order.
    pub members: Vec<MemberState>,
    /// The proxy health member.
    pub proxy_health: Option<MemberState>,
}

impl ClusterSnapshot {
    pub fn capture(round: u64, members: &[Member], proxy_health: &Member) -> Self {
        Self {
            round,
            published_at: Some(Utc::now()),
            members: members.iter().map(Member::state).collect(),
            proxy_health: Some(proxy_health.state()),
        }
    }
}

/// Single-writer, multi-reader holder of the latest snapshot.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    current: ArcSwap<ClusterSnapshot>,
}

impl SnapshotPublisher {
    /// Create a publisher holding an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot wholesale.
    pub fn publish(&self, snapshot: ClusterSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// The most recently published snapshot.
    pub fn fetch(&self) -> Arc<ClusterSnapshot> {
        self.current.load_full()
    }
}

/// A shared reference to the snapshot publisher.
pub type SharedPublisher = Arc<SnapshotPublisher>;
