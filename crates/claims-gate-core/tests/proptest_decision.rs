// crates/claims-gate-core/tests/proptest_decision.rs
// ============================================================================
// Module: Decision Property-Based Tests
// Description: Property tests for decision table invariants.
// Purpose: Check owner, misconfiguration, role, and idempotence properties
//          across arbitrary claims.
// ============================================================================

//! Property-based tests for authorization decision invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use claims_gate_core::ClaimsContext;
use claims_gate_core::Decision;
use claims_gate_core::DenialCategory;
use claims_gate_core::GatewayRequest;
use claims_gate_core::Grant;
use claims_gate_core::OwnerRule;
use claims_gate_core::Policy;
use claims_gate_core::Role;
use claims_gate_core::evaluate;
use claims_gate_core::role_satisfied;
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn scope_strategy() -> impl Strategy<Value = String> {
    "[a-z:]{1,8}"
}

fn optional_claim() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9 ,]{0,12}")
}

prop_compose! {
    fn claims_strategy()(
        owner in optional_claim(),
        principal in optional_claim(),
        scope in optional_claim(),
        role in optional_claim(),
    ) -> ClaimsContext {
        [("owner_id", owner), ("principal_id", principal), ("scope", scope), ("role", role)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }
}

prop_compose! {
    fn policy_strategy()(
        scope in prop::option::of(scope_strategy()),
        explicit in any::<bool>(),
        role in prop::option::of(role_strategy()),
        self_edit in any::<bool>(),
    ) -> Policy {
        let mut policy =
            Policy::require_scope(scope.unwrap_or_default()).with_explicit_scope(explicit);
        policy.required_role = role;
        if self_edit {
            policy = policy.allow_self_edit(OwnerRule::Claim("principal_id".to_string()));
        }
        policy
    }
}

fn request(claims: ClaimsContext) -> GatewayRequest {
    GatewayRequest::new("POST", "/games").with_claims(claims)
}

proptest! {
    #[test]
    fn missing_owner_always_unauthorized_unless_misconfigured(
        claims in claims_strategy(),
        policy in policy_strategy(),
    ) {
        let claims: ClaimsContext = claims
            .raw("principal_id")
            .cloned()
            .map(|value| ClaimsContext::new().with_claim("principal_id", value))
            .unwrap_or_default();
        let decision = evaluate(&policy, &request(claims));
        if policy.misconfiguration().is_some() {
            prop_assert_eq!(decision, Decision::DenyMisconfigured);
        } else {
            prop_assert_eq!(decision, Decision::DenyMissingOwner);
            prop_assert_eq!(
                decision.denial().map(|denial| denial.category),
                Some(DenialCategory::Unauthorized)
            );
        }
    }

    #[test]
    fn empty_explicit_scope_always_misconfigured(claims in claims_strategy()) {
        let policy = Policy::require_scope("").with_explicit_scope(true).with_role(Role::Tester);
        prop_assert_eq!(evaluate(&policy, &request(claims)), Decision::DenyMisconfigured);
    }

    #[test]
    fn granted_scope_always_allows(
        owner in "[a-z0-9]{1,8}",
        required in scope_strategy(),
        others in prop::collection::vec(scope_strategy(), 0 .. 4),
    ) {
        let mut granted = others;
        granted.push(required.clone());
        let claims = ClaimsContext::new()
            .with_claim("owner_id", owner)
            .with_claim("scope", granted.join(","));
        let decision = evaluate(&Policy::require_scope(required), &request(claims));
        prop_assert!(decision.is_allow());
    }

    #[test]
    fn role_rank_admits_when_scope_missing(
        required in role_strategy(),
        held in role_strategy(),
    ) {
        let claims = ClaimsContext::new()
            .with_claim("owner_id", "u1")
            .with_claim("scope", "openid")
            .with_claim("role", held.label());
        let policy = Policy::require_scope("results").with_role(required);
        let expected = if held >= required {
            Decision::Allow(Grant::Role)
        } else {
            Decision::DenyUnauthorized
        };
        prop_assert_eq!(evaluate(&policy, &request(claims)), expected);
        prop_assert_eq!(role_satisfied(required, held.label()), held.rank() >= required.rank());
    }

    #[test]
    fn evaluation_is_idempotent(claims in claims_strategy(), policy in policy_strategy()) {
        let req = request(claims);
        let first = evaluate(&policy, &req);
        for _ in 0 .. 3 {
            prop_assert_eq!(evaluate(&policy, &req), first);
        }
    }

    #[test]
    fn self_edit_bypass_ignores_scope_and_role(
        user in "[a-z0-9]{1,8}",
        required in scope_strategy(),
    ) {
        let claims = ClaimsContext::new()
            .with_claim("owner_id", "tenant")
            .with_claim("principal_id", user.clone());
        let target = user.clone();
        let policy = Policy::require_scope(required)
            .with_role(Role::God)
            .allow_self_edit(OwnerRule::custom(move |_| Some(target.clone())));
        prop_assert_eq!(evaluate(&policy, &request(claims)), Decision::Allow(Grant::OwnerMatch));
    }
}
