//! Primary resolution.
//!
//! # Policy
//! - Exactly one member reporting primary → that member
//! - More than one → split-brain, nothing is actionable
//! - None → outage, nothing is actionable
//!
//! Split-brain is never resolved by preference (name, age, ...). Both
//! non-actionable outcomes leave the proxy configuration untouched.

use crate::cluster::{Member, Role};

/// Outcome of resolving one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The unique primary, by name.
    Primary(String),
    /// Every member claiming the primary role.
    SplitBrain(Vec<String>),
    /// No member claims the primary role.
    NoPrimary,
}

/// Resolve the cluster primary from a completed round.
///
/// `members` must not include the proxy health member.
pub fn resolve(members: &[Member]) -> Resolution {
    let mut primaries: Vec<String> = members
        .iter()
        .filter(|m| m.role() == Role::Primary)
        .map(|m| m.name.clone())
        .collect();

    match primaries.len() {
        0 => Resolution::NoPrimary,
        1 => Resolution::Primary(primaries.remove(0)),
        _ => Resolution::SplitBrain(primaries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn members(roles: &[(&str, Role)]) -> Vec<Member> {
        let now = Utc::now();
        roles
            .iter()
            .map(|(name, role)| {
                let mut m = Member::new(*name, "");
                m.observe(*role, now);
                m
            })
            .collect()
    }

    #[test]
    fn test_single_primary() {
        let round = members(&[("a", Role::Standby), ("b", Role::Primary), ("c", Role::Standby)]);
        assert_eq!(resolve(&round), Resolution::Primary("b".into()));
    }

    #[test]
    fn test_split_brain_names_every_primary() {
        let round = members(&[("a", Role::Primary), ("b", Role::Primary), ("c", Role::Down)]);
        assert_eq!(resolve(&round), Resolution::SplitBrain(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_no_primary() {
        let round = members(&[("a", Role::Standby), ("b", Role::Standby), ("c", Role::Down)]);
        assert_eq!(resolve(&round), Resolution::NoPrimary);
        assert_eq!(resolve(&[]), Resolution::NoPrimary);
    }
}
