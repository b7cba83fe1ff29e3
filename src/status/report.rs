//! Status rendering and health classification.
//!
//! Everything here is a pure function of a [`ClusterSnapshot`]; the HTTP
//! handlers in `server.rs` only fetch and format.

use std::fmt::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cluster::{MemberState, Role};
use crate::status::snapshot::ClusterSnapshot;

/// A snapshot counts as stale once its oldest check is this many
/// intervals old.
pub const STALENESS_INTERVALS: u32 = 3;

/// Monitoring severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthLevel {
    Ok,
    Warning,
    Critical,
}

impl HealthLevel {
    /// Monitoring-plugin exit code (0 OK, 1 WARNING, 2 CRITICAL).
    pub fn exit_code(self) -> i32 {
        match self {
            HealthLevel::Ok => 0,
            HealthLevel::Warning => 1,
            HealthLevel::Critical => 2,
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthLevel::Ok => "OK",
            HealthLevel::Warning => "WARNING",
            HealthLevel::Critical => "CRITICAL",
        })
    }
}

/// Health classification of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub level: HealthLevel,
    pub summary: String,
    pub primaries: usize,
    pub standbys: usize,
    pub down: usize,
    /// Age in seconds of the oldest check; `None` if a member was never checked.
    pub oldest_check_secs: Option<i64>,
}

impl HealthReport {
    /// Classify `snapshot` as of `now`, given the normal polling interval.
    ///
    /// The proxy health member is not counted.
    pub fn evaluate(snapshot: &ClusterSnapshot, now: DateTime<Utc>, interval: Duration) -> Self {
        let mut primaries = 0;
        let mut standbys = 0;
        let mut down = 0;
        for member in &snapshot.members {
            match member.role {
                Role::Primary => primaries += 1,
                Role::Standby => standbys += 1,
                Role::Down => down += 1,
            }
        }

        let oldest_check_secs = oldest_check(&snapshot.members).map(|t| (now - t).num_seconds());
        let max_age = interval.as_secs() as i64 * i64::from(STALENESS_INTERVALS);

        let (level, summary) = if primaries == 0 {
            (
                HealthLevel::Critical,
                format!("No primary available ({} standbys, {} down)", standbys, down),
            )
        } else if primaries > 1 {
            (
                HealthLevel::Critical,
                format!(
                    "Multiple primaries, possible split-brain ({} primaries, {} standbys, {} down)",
                    primaries, standbys, down
                ),
            )
        } else if down > 0 {
            (
                HealthLevel::Warning,
                format!(
                    "{} servers down ({} primary, {} standbys active)",
                    down, primaries, standbys
                ),
            )
        } else {
            match oldest_check_secs {
                Some(age) if age <= max_age => (
                    HealthLevel::Ok,
                    format!("{} primary, {} standbys active", primaries, standbys),
                ),
                Some(age) => (
                    HealthLevel::Warning,
                    format!("Oldest check {} seconds ago, more than {}", age, max_age),
                ),
                None => (
                    HealthLevel::Warning,
                    "Some servers have never been checked".to_string(),
                ),
            }
        };

        Self {
            level,
            summary,
            primaries,
            standbys,
            down,
            oldest_check_secs,
        }
    }

    /// One-line `LEVEL: summary` form.
    pub fn line(&self) -> String {
        format!("{}: {}", self.level, self.summary)
    }
}

/// Oldest check time, or `None` if any member is unchecked.
fn oldest_check(members: &[MemberState]) -> Option<DateTime<Utc>> {
    members
        .iter()
        .map(|m| m.last_checked)
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .min()
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.to_rfc3339(),
        None => "never".to_string(),
    }
}

/// Full-detail plaintext view.
pub fn render_detail(snapshot: &ClusterSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current time: {}", now.to_rfc3339());
    let _ = writeln!(out, "Round: {}", snapshot.round);
    let _ = writeln!(out, "\nNode status:");
    for member in &snapshot.members {
        let _ = writeln!(
            out,
            "{}: {} (last checked {}, role since {})",
            member.name,
            member.role,
            format_time(member.last_checked),
            format_time(member.last_role_change)
        );
    }
    if let Some(proxy) = &snapshot.proxy_health {
        let _ = writeln!(
            out,
            "\nThrough proxy: {} (last checked {})",
            proxy.role,
            format_time(proxy.last_checked)
        );
    }
    out
}

/// Terse `name: role` listing, one member per line.
pub fn render_nodes(snapshot: &ClusterSnapshot) -> String {
    snapshot
        .members
        .iter()
        .map(|m| format!("{}: {}\n", m.name, m.role))
        .collect()
}
