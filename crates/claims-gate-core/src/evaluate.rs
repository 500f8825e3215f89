// crates/claims-gate-core/src/evaluate.rs
// ============================================================================
// Module: Authorization Evaluation
// Description: Scope, role, and ownership checks composed into one decision table.
// Purpose: Decide allow or deny for a request as a pure function of its policy.
// Dependencies: crate::{claims, decision, policy, request, role}
// ============================================================================

//! ## Overview
//! Evaluation is short-circuiting; the first matching row wins:
//!
//! 1. Empty required scope with explicit scope mandated: misconfigured.
//! 2. Owner claim missing: deny.
//! 3. Empty required scope otherwise: allow.
//! 4. Self-edit bypass (owner rule resolves to the current user): allow.
//! 5. Required scope granted: allow.
//! 6. Caller role ranks at or above the required role: allow.
//! 7. Otherwise: unauthorized.
//!
//! ## Invariants
//! - Evaluation reads only the policy and request; identical inputs always
//!   produce identical decisions.
//! - Scopes match by exact membership; roles match by rank.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::decision::AuthzError;
use crate::decision::Decision;
use crate::decision::Grant;
use crate::policy::Policy;
use crate::request::GatewayRequest;
use crate::role::role_satisfied;

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Returns true when `required` is a member of the granted scope set.
#[must_use]
pub fn scope_satisfied(required: &str, granted: &BTreeSet<&str>) -> bool {
    granted.contains(required)
}

/// Returns true when the policy's owner rule resolves to the authenticated caller.
///
/// Returns false when no owner rule is configured, or when either identity
/// is absent or blank.
#[must_use]
pub fn owner_matches(policy: &Policy, request: &GatewayRequest) -> bool {
    let Some(rule) = &policy.owner_rule else {
        return false;
    };
    let Some(caller) = request.claims().current_user(&policy.claim_keys.caller) else {
        return false;
    };
    rule.resolve(request).is_some_and(|target| !target.trim().is_empty() && target == caller)
}

// ============================================================================
// SECTION: Decision Table
// ============================================================================

/// Runs the decision table and returns the grant path or the failure.
///
/// # Errors
///
/// Returns [`AuthzError`] describing why the request is denied.
pub fn authorize(policy: &Policy, request: &GatewayRequest) -> Result<Grant, AuthzError> {
    if let Some(detail) = policy.misconfiguration() {
        return Err(AuthzError::Misconfigured(detail));
    }
    let claims = request.claims();
    let keys = &policy.claim_keys;
    claims.owner(&keys.owner)?;

    if policy.scope_not_required() {
        return Ok(Grant::ScopeNotRequired);
    }
    if policy.user_edit_allowed && owner_matches(policy, request) {
        return Ok(Grant::OwnerMatch);
    }
    if scope_satisfied(policy.required_scope.trim(), &claims.scope_set(&keys.scope)) {
        return Ok(Grant::Scope);
    }
    let caller_role = claims.lookup(&keys.role);
    let role_granted = policy
        .required_role
        .zip(caller_role)
        .is_some_and(|(required, label)| role_satisfied(required, label));
    if role_granted {
        return Ok(Grant::Role);
    }
    Err(AuthzError::Unauthorized)
}

/// Evaluates the policy against the request.
#[must_use]
pub fn evaluate(policy: &Policy, request: &GatewayRequest) -> Decision {
    Decision::from(authorize(policy, request))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimsContext;
    use crate::policy::OwnerRule;
    use crate::role::Role;

    fn request(claims: ClaimsContext) -> GatewayRequest {
        GatewayRequest::new("GET", "/").with_claims(claims)
    }

    #[test]
    fn scope_membership_is_exact() {
        let granted: BTreeSet<&str> = ["results", "games:read"].into_iter().collect();
        assert!(scope_satisfied("results", &granted));
        assert!(!scope_satisfied("result", &granted));
        assert!(!scope_satisfied("games", &granted));
        assert!(!scope_satisfied("", &granted));
    }

    #[test]
    fn owner_matches_requires_rule_and_caller() {
        let req = request(ClaimsContext::new().with_claim("owner_id", "t1"))
            .with_path_parameter("user_id", "u1");
        let policy = Policy::require_scope("x")
            .allow_self_edit(OwnerRule::PathParameter("user_id".to_string()));
        assert!(!owner_matches(&policy, &req));
        assert!(!owner_matches(&Policy::require_scope("x"), &req));
    }

    #[test]
    fn owner_matches_rejects_other_users() {
        let req = request(ClaimsContext::new().with_claim("principal_id", "u2"))
            .with_path_parameter("user_id", "u1");
        let policy = Policy::require_scope("x")
            .allow_self_edit(OwnerRule::PathParameter("user_id".to_string()));
        assert!(!owner_matches(&policy, &req));
    }

    #[test]
    fn owner_match_without_user_edit_falls_through_to_scope() {
        let req = request(
            ClaimsContext::new().with_claim("owner_id", "u1").with_claim("principal_id", "u1"),
        );
        let mut policy = Policy::require_scope("users")
            .allow_self_edit(OwnerRule::custom(|_| Some("u1".to_string())));
        policy.user_edit_allowed = false;
        assert_eq!(evaluate(&policy, &req), Decision::DenyUnauthorized);
    }

    #[test]
    fn role_is_ignored_when_not_configured() {
        let req = request(
            ClaimsContext::new()
                .with_claim("owner_id", "u1")
                .with_claim("scope", "openid")
                .with_claim("role", "god"),
        );
        assert_eq!(evaluate(&Policy::require_scope("results"), &req), Decision::DenyUnauthorized);
    }

    #[test]
    fn role_alternative_admits_higher_rank() {
        let req = request(
            ClaimsContext::new()
                .with_claim("owner_id", "u1")
                .with_claim("scope", "openid")
                .with_claim("role", "publisher"),
        );
        let policy = Policy::require_scope("results").with_role(Role::Operator);
        assert_eq!(evaluate(&policy, &req), Decision::Allow(Grant::Role));
    }

    #[test]
    fn empty_scope_without_explicit_requirement_allows_owners() {
        let req = request(ClaimsContext::new().with_claim("owner_id", "u1"));
        assert_eq!(evaluate(&Policy::owner_only(), &req), Decision::Allow(Grant::ScopeNotRequired));
        assert_eq!(
            evaluate(&Policy::owner_only(), &request(ClaimsContext::new())),
            Decision::DenyMissingOwner
        );
    }

    #[test]
    fn blank_required_scope_matches_empty_scope_handling() {
        let req = request(
            ClaimsContext::new().with_claim("owner_id", "u1").with_claim("scope", "results"),
        );
        assert_eq!(evaluate(&Policy::require_scope("  "), &req), Decision::DenyMisconfigured);
        assert_eq!(
            evaluate(&Policy::require_scope(" \t").with_explicit_scope(false), &req),
            Decision::Allow(Grant::ScopeNotRequired)
        );
        assert_eq!(
            evaluate(&Policy::require_scope(" results "), &req),
            Decision::Allow(Grant::Scope)
        );
    }
}
