// crates/claims-gate-core/src/claims.rs
// ============================================================================
// Module: Claims Context
// Description: Read-only claim store populated by the upstream gateway authorizer.
// Purpose: Provide typed, presence-aware claim lookups for authorization.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The claims context is the authorizer map attached to each request by the
//! API gateway after it has validated the caller's token. Values are opaque
//! JSON; typed accessors return `Option` so an absent or mistyped claim is a
//! representable condition rather than a fault.
//!
//! ## Invariants
//! - Lookups never panic and never mutate the context.
//! - Non-string claim values are treated as absent by string accessors.
//! - Blank identity claims are treated as absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::decision::AuthzError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Claim carrying the owner (tenant) identity of the request.
pub const OWNER_CLAIM: &str = "owner_id";
/// Claim carrying the authenticated caller identity.
pub const PRINCIPAL_CLAIM: &str = "principal_id";
/// Standard JWT subject claim, used as a fallback caller identity.
pub const SUBJECT_CLAIM: &str = "sub";
/// Claim carrying the delimited scope set.
pub const SCOPE_CLAIM: &str = "scope";
/// Claim carrying the caller's role label.
pub const ROLE_CLAIM: &str = "role";
/// Default delimiter between granted scopes.
pub const DEFAULT_SCOPE_DELIMITER: char = ',';

// ============================================================================
// SECTION: Claim Key Configuration
// ============================================================================

/// Location and encoding of the granted scope set.
///
/// # Invariants
/// - `delimiter` separates individual scopes inside the claim value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeClaim {
    /// Claim key holding the scope string (`scope` or `scp`).
    pub key: String,
    /// Delimiter between scopes (comma or space).
    pub delimiter: char,
}

impl ScopeClaim {
    /// Creates a scope claim description.
    #[must_use]
    pub fn new(key: impl Into<String>, delimiter: char) -> Self {
        Self {
            key: key.into(),
            delimiter,
        }
    }
}

impl Default for ScopeClaim {
    fn default() -> Self {
        Self::new(SCOPE_CLAIM, DEFAULT_SCOPE_DELIMITER)
    }
}

/// Claim keys consulted during evaluation.
///
/// # Invariants
/// - `caller` is ordered by priority; the first present claim wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimKeys {
    /// Owner identity claim key.
    pub owner: String,
    /// Caller identity claim keys, in priority order.
    pub caller: Vec<String>,
    /// Role label claim key.
    pub role: String,
    /// Scope set claim location.
    pub scope: ScopeClaim,
}

impl Default for ClaimKeys {
    fn default() -> Self {
        Self {
            owner: OWNER_CLAIM.to_string(),
            caller: vec![PRINCIPAL_CLAIM.to_string(), SUBJECT_CLAIM.to_string()],
            role: ROLE_CLAIM.to_string(),
            scope: ScopeClaim::default(),
        }
    }
}

// ============================================================================
// SECTION: Claims Context
// ============================================================================

/// Immutable claim map attached to a request by the gateway authorizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsContext(BTreeMap<String, Value>);

impl ClaimsContext {
    /// Creates an empty claims context.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns a copy of the context with an additional claim.
    #[must_use]
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns true when the claim key is present, regardless of its type.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the raw claim value when present.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a string claim.
    ///
    /// Returns `None` when the key is absent or holds a non-string value.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the owner identity under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::MissingOwner`] when the claim is absent, not a
    /// string, or blank.
    pub fn owner(&self, key: &str) -> Result<&str, AuthzError> {
        self.identity(key).ok_or(AuthzError::MissingOwner)
    }

    /// Returns the authenticated caller identity using the first present key.
    #[must_use]
    pub fn current_user<S: AsRef<str>>(&self, keys: &[S]) -> Option<&str> {
        keys.iter().find_map(|key| self.identity(key.as_ref()))
    }

    /// Splits the configured scope claim into a set of granted scopes.
    ///
    /// Entries are trimmed and empty entries dropped, so `"a, b"` and `"a b"`
    /// yield the same set under comma and space delimiters respectively.
    #[must_use]
    pub fn scope_set(&self, claim: &ScopeClaim) -> BTreeSet<&str> {
        self.lookup(&claim.key).map_or_else(BTreeSet::new, |raw| {
            raw.split(claim.delimiter).map(str::trim).filter(|scope| !scope.is_empty()).collect()
        })
    }

    /// Returns the number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no claims are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a non-blank string claim.
    fn identity(&self, key: &str) -> Option<&str> {
        self.lookup(key).filter(|value| !value.trim().is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for ClaimsContext
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl From<BTreeMap<String, Value>> for ClaimsContext {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
