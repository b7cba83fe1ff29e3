//! Cluster member records and role state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a member as seen by its most recent probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unreachable, refused us, or did not answer in time.
    #[default]
    Down,
    /// Hot standby (in recovery).
    Standby,
    /// Writable primary.
    Primary,
}

impl Role {
    /// Role reported by `pg_is_in_recovery()`.
    pub fn from_recovery(in_recovery: bool) -> Self {
        if in_recovery {
            Role::Standby
        } else {
            Role::Primary
        }
    }

    /// Numeric encoding used by the role gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            Role::Down => 0.0,
            Role::Standby => 1.0,
            Role::Primary => 2.0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Down => "down",
            Role::Standby => "standby",
            Role::Primary => "primary",
        })
    }
}

/// One probed endpoint: a cluster member or the proxy health target.
#[derive(Debug, Clone)]
pub struct Member {
    /// Unique name; also names the member's configuration artifact.
    pub name: String,
    /// Connection descriptor, passed to the driver untouched.
    pub descriptor: String,
    role: Role,
    last_checked: Option<DateTime<Utc>>,
    last_role_change: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            role: Role::Down,
            last_checked: None,
            last_role_change: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    pub fn last_role_change(&self) -> Option<DateTime<Utc>> {
        self.last_role_change
    }

    /// Record a completed probe. Returns true when the role changed.
    pub fn observe(&mut self, role: Role, now: DateTime<Utc>) -> bool {
        let changed = role != self.role;
        if changed {
            tracing::info!(member = %self.name, from = %self.role, to = %role, "Member role changed");
            self.role = role;
            self.last_role_change = Some(now);
        }
        self.last_checked = Some(now);
        changed
    }

    /// Credential-free view for snapshots.
    pub fn state(&self) -> MemberState {
        MemberState {
            name: self.name.clone(),
            role: self.role,
            last_checked: self.last_checked,
            last_role_change: self.last_role_change,
        }
    }
}

/// Published state of one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    pub name: String,
    pub role: Role,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_role_change: Option<DateTime<Utc>>,
}
