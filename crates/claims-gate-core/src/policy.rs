// crates/claims-gate-core/src/policy.rs
// ============================================================================
// Module: Authorization Policy
// Description: Explicit policy value describing what a request must satisfy.
// Purpose: Replace implicit field-presence semantics with named, togglable flags.
// Dependencies: crate::{claims, request, role}
// ============================================================================

//! ## Overview
//! A [`Policy`] is captured once when a handler is wrapped and is never
//! mutated afterwards. Every flag is independent: the scope requirement, the
//! role alternative, and the self-edit ownership bypass can each be toggled
//! without changing how the others behave.
//!
//! ## Invariants
//! - An empty or blank `required_scope` is a misconfiguration iff
//!   `require_explicit_scope` is set.
//! - The ownership bypass applies only when `user_edit_allowed` is set and an
//!   owner rule is configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::claims::ClaimKeys;
use crate::claims::ScopeClaim;
use crate::request::GatewayRequest;
use crate::role::Role;

// ============================================================================
// SECTION: Owner Rules
// ============================================================================

/// Resolver for caller-supplied owner rules.
pub type OwnerResolver = Arc<dyn Fn(&GatewayRequest) -> Option<String> + Send + Sync>;

/// How the identity a request concerns is resolved.
#[derive(Clone)]
pub enum OwnerRule {
    /// Identity taken from a path template parameter.
    PathParameter(String),
    /// Identity taken from a query string parameter.
    QueryParameter(String),
    /// Identity taken from an authorizer claim.
    Claim(String),
    /// Identity computed by a caller-supplied function.
    Custom(OwnerResolver),
}

impl OwnerRule {
    /// Creates a custom owner rule from a closure.
    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(&GatewayRequest) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(resolver))
    }

    /// Resolves the identity the request concerns, if any.
    #[must_use]
    pub fn resolve<'a>(&self, request: &'a GatewayRequest) -> Option<Cow<'a, str>> {
        match self {
            Self::PathParameter(name) => request.path_parameter(name).map(Cow::Borrowed),
            Self::QueryParameter(name) => request.query_parameter(name).map(Cow::Borrowed),
            Self::Claim(name) => request.claims().lookup(name).map(Cow::Borrowed),
            Self::Custom(resolver) => resolver(request).map(Cow::Owned),
        }
    }
}

impl fmt::Debug for OwnerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathParameter(name) => f.debug_tuple("PathParameter").field(name).finish(),
            Self::QueryParameter(name) => f.debug_tuple("QueryParameter").field(name).finish(),
            Self::Claim(name) => f.debug_tuple("Claim").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Authorization requirements for a wrapped handler.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Scope that must be present in the granted scope set.
    pub required_scope: String,
    /// Treat an empty `required_scope` as a misconfiguration instead of
    /// "no scope required".
    pub require_explicit_scope: bool,
    /// Role that admits the caller when the scope check fails.
    pub required_role: Option<Role>,
    /// Rule resolving the identity the request concerns.
    pub owner_rule: Option<OwnerRule>,
    /// Allow callers to act on their own resource without scope or role.
    pub user_edit_allowed: bool,
    /// Claim keys consulted during evaluation.
    pub claim_keys: ClaimKeys,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            required_scope: String::new(),
            require_explicit_scope: true,
            required_role: None,
            owner_rule: None,
            user_edit_allowed: false,
            claim_keys: ClaimKeys::default(),
        }
    }
}

impl Policy {
    /// Creates a policy requiring `scope`.
    #[must_use]
    pub fn require_scope(scope: impl Into<String>) -> Self {
        Self {
            required_scope: scope.into(),
            ..Self::default()
        }
    }

    /// Creates a policy that requires no scope, only an owner claim.
    #[must_use]
    pub fn owner_only() -> Self {
        Self {
            require_explicit_scope: false,
            ..Self::default()
        }
    }

    /// Sets the role that admits callers failing the scope check.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    /// Sets the owner rule and enables the self-edit bypass.
    #[must_use]
    pub fn allow_self_edit(mut self, rule: OwnerRule) -> Self {
        self.owner_rule = Some(rule);
        self.user_edit_allowed = true;
        self
    }

    /// Sets whether an empty required scope is a misconfiguration.
    #[must_use]
    pub const fn with_explicit_scope(mut self, required: bool) -> Self {
        self.require_explicit_scope = required;
        self
    }

    /// Overrides the claim keys.
    #[must_use]
    pub fn with_claim_keys(mut self, keys: ClaimKeys) -> Self {
        self.claim_keys = keys;
        self
    }

    /// Overrides where the scope set is read from.
    #[must_use]
    pub fn with_scope_claim(mut self, claim: ScopeClaim) -> Self {
        self.claim_keys.scope = claim;
        self
    }

    /// Returns true when the policy demands no scope. Blank scopes count as empty.
    #[must_use]
    pub fn scope_not_required(&self) -> bool {
        self.required_scope.trim().is_empty()
    }

    /// Returns a description of the first misconfiguration, if any.
    #[must_use]
    pub fn misconfiguration(&self) -> Option<&'static str> {
        if self.scope_not_required() && self.require_explicit_scope {
            return Some("required scope is empty while an explicit scope is mandated");
        }
        None
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::use_debug, reason = "Debug output is the behavior under test.")]

    use super::*;
    use crate::claims::ClaimsContext;

    #[test]
    fn default_policy_is_misconfigured() {
        assert!(Policy::default().misconfiguration().is_some());
    }

    #[test]
    fn blank_scope_is_misconfigured() {
        let policy = Policy::require_scope("  ");
        assert!(policy.scope_not_required());
        assert!(policy.misconfiguration().is_some());
        assert!(policy.with_explicit_scope(false).misconfiguration().is_none());
    }

    #[test]
    fn owner_only_policy_is_valid() {
        assert!(Policy::owner_only().misconfiguration().is_none());
    }

    #[test]
    fn owner_rules_resolve_from_each_source() {
        let request = GatewayRequest::new("PUT", "/users/u1")
            .with_path_parameter("user_id", "u1")
            .with_query_parameter("user", "u2")
            .with_claims(ClaimsContext::new().with_claim("target", "u3"));
        let resolved = [
            OwnerRule::PathParameter("user_id".to_string()),
            OwnerRule::QueryParameter("user".to_string()),
            OwnerRule::Claim("target".to_string()),
            OwnerRule::custom(|req| Some(req.path.trim_start_matches("/users/").to_string())),
        ]
        .iter()
        .map(|rule| rule.resolve(&request).map(Cow::into_owned))
        .collect::<Vec<_>>();
        assert_eq!(resolved, vec![
            Some("u1".to_string()),
            Some("u2".to_string()),
            Some("u3".to_string()),
            Some("u1".to_string()),
        ]);
    }

    #[test]
    fn owner_rule_debug_hides_custom_closure() {
        let rule = OwnerRule::custom(|_| None);
        assert_eq!(format!("{rule:?}"), "Custom(..)");
    }
}
