//! Active health checking.
//!
//! # Responsibilities
//! - Race each probe against the per-check timeout
//! - Probe every member of a round concurrently and wait for all of them
//! - Record results on the members

use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::time;

use crate::cluster::{Member, Role};
use crate::health::probe::RoleProbe;

/// Probe one member and record the result on it.
///
/// Errors and timeouts both yield [`Role::Down`]. A probe that loses the
/// race is dropped, so a late answer can never be recorded.
pub async fn probe_member(probe: &dyn RoleProbe, member: &mut Member, timeout: Duration) -> Role {
    let role = match time::timeout(timeout, probe.check(&member.descriptor)).await {
        Ok(Ok(role)) => role,
        Ok(Err(e)) => {
            tracing::warn!(member = %member.name, error = %e, "Probe failed");
            Role::Down
        }
        Err(_) => {
            tracing::warn!(
                member = %member.name,
                timeout_ms = timeout.as_millis() as u64,
                "Probe timed out"
            );
            Role::Down
        }
    };

    member.observe(role, Utc::now());
    role
}

/// Probe all cluster members and the proxy health member concurrently.
///
/// Each future owns a disjoint `&mut Member`, so no locking is needed.
/// Returns once every probe has completed or timed out.
pub async fn probe_round(
    probe: &dyn RoleProbe,
    members: &mut [Member],
    proxy_health: &mut Member,
    timeout: Duration,
) {
    let checks = members
        .iter_mut()
        .chain(std::iter::once(proxy_health))
        .map(|member| probe_member(probe, member, timeout));

    join_all(checks).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::probe::ProbeError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Answers by `host`, optionally after a delay.
    struct ScriptedProbe {
        answers: HashMap<String, (Duration, Result<Role, ProbeError>)>,
    }

    #[async_trait]
    impl RoleProbe for ScriptedProbe {
        async fn check(&self, descriptor: &str) -> Result<Role, ProbeError> {
            let host = descriptor.trim_start_matches("host=");
            let (delay, answer) = self.answers[host].clone();
            time::sleep(delay).await;
            answer
        }
    }

    fn member(host: &str) -> Member {
        Member::new(host, format!("host={}", host))
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_is_discarded() {
        let probe = ScriptedProbe {
            answers: HashMap::from([(
                "slow".to_string(),
                (Duration::from_secs(10), Ok(Role::Primary)),
            )]),
        };
        let mut slow = member("slow");

        let role = probe_member(&probe, &mut slow, Duration::from_secs(3)).await;
        assert_eq!(role, Role::Down);
        assert_eq!(slow.role(), Role::Down);
        assert!(slow.last_checked().is_some());
    }

    #[tokio::test]
    async fn test_error_maps_to_down() {
        let probe = ScriptedProbe {
            answers: HashMap::from([(
                "broken".to_string(),
                (Duration::ZERO, Err(ProbeError::Connect("refused".into()))),
            )]),
        };
        let mut broken = member("broken");
        broken.observe(Role::Standby, Utc::now());

        assert_eq!(probe_member(&probe, &mut broken, Duration::from_secs(3)).await, Role::Down);
        assert_eq!(broken.role(), Role::Down);
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_runs_probes_concurrently() {
        let probe = ScriptedProbe {
            answers: HashMap::from([
                ("a".to_string(), (Duration::from_secs(2), Ok(Role::Standby))),
                ("b".to_string(), (Duration::from_secs(2), Ok(Role::Primary))),
                ("c".to_string(), (Duration::from_secs(60), Ok(Role::Standby))),
                ("proxy".to_string(), (Duration::from_secs(2), Ok(Role::Primary))),
            ]),
        };
        let mut members = vec![member("a"), member("b"), member("c")];
        let mut proxy = member("proxy");

        let started = time::Instant::now();
        probe_round(&probe, &mut members, &mut proxy, Duration::from_secs(3)).await;

        // Bounded by the timeout, not by the sum of the delays.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
        let roles: Vec<Role> = members.iter().map(Member::role).collect();
        assert_eq!(roles, vec![Role::Standby, Role::Primary, Role::Down]);
        assert_eq!(proxy.role(), Role::Primary);
        assert!(members.iter().all(|m| m.last_checked().is_some()));
    }
}
