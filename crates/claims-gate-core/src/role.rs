// crates/claims-gate-core/src/role.rs
// ============================================================================
// Module: Role Hierarchy
// Description: Ranked role labels used as an alternative to scopes.
// Purpose: Provide monotonic role comparison over a fixed label table.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Roles are ranked, not set-based: a caller holding a higher rank holds every
//! lower-rank privilege. Scopes, by contrast, are flat membership checks.
//!
//! ## Invariants
//! - `Tester < Launcher < Operator < Publisher < Administrator < God`.
//! - Unknown labels never satisfy any required role.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Role
// ============================================================================

/// Ranked caller role.
///
/// # Invariants
/// - Declaration order matches rank order, so derived `Ord` is the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Rank 1.
    Tester,
    /// Rank 2.
    Launcher,
    /// Rank 3.
    Operator,
    /// Rank 4.
    Publisher,
    /// Rank 5.
    Administrator,
    /// Rank 6.
    God,
}

impl Role {
    /// All roles in ascending rank order.
    pub const ALL: [Self; 6] =
        [
            Self::Tester,
            Self::Launcher,
            Self::Operator,
            Self::Publisher,
            Self::Administrator,
            Self::God,
        ];

    /// Returns the 1-based rank of the role.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Tester => 1,
            Self::Launcher => 2,
            Self::Operator => 3,
            Self::Publisher => 4,
            Self::Administrator => 5,
            Self::God => 6,
        }
    }

    /// Returns the stable claim label for the role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tester => "tester",
            Self::Launcher => "launcher",
            Self::Operator => "operator",
            Self::Publisher => "publisher",
            Self::Administrator => "administrator",
            Self::God => "god",
        }
    }

    /// Resolves a claim label (ASCII case-insensitive) to a role.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|role| role.label().eq_ignore_ascii_case(label))
    }

    /// Returns true when this role meets or exceeds `required`.
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role label: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value).ok_or_else(|| UnknownRole(value.to_string()))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Returns true when the caller's role label ranks at or above `required`.
///
/// Unknown or empty labels count as holding no role and always return false.
#[must_use]
pub fn role_satisfied(required: Role, caller_label: &str) -> bool {
    Role::from_label(caller_label).is_some_and(|role| role.satisfies(required))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(Role::from_label("Administrator"), Some(Role::Administrator));
        assert_eq!(Role::from_label(" GOD "), Some(Role::God));
        assert_eq!("launcher".parse::<Role>(), Ok(Role::Launcher));
    }

    #[test]
    fn unknown_labels_never_satisfy() {
        assert!(!role_satisfied(Role::Tester, "user"));
        assert!(!role_satisfied(Role::Tester, ""));
        assert_eq!("user".parse::<Role>(), Err(UnknownRole("user".to_string())));
    }

    #[test]
    fn tester_is_satisfied_by_every_known_role() {
        for role in Role::ALL {
            assert!(role_satisfied(Role::Tester, role.label()), "{role} should satisfy tester");
        }
    }

    #[test]
    fn god_is_satisfied_only_by_god() {
        for role in Role::ALL {
            assert_eq!(role_satisfied(Role::God, role.label()), role == Role::God);
        }
    }

    #[test]
    fn roles_serialize_as_labels() {
        let encoded = serde_json::to_string(&Role::Publisher).unwrap_or_default();
        assert_eq!(encoded, "\"publisher\"");
    }
}
