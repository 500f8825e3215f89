// crates/claims-gate-core/src/lib.rs
// ============================================================================
// Module: Claims Gate Core Library
// Description: Public API surface for the Claims Gate core.
// Purpose: Expose claims, policy, decision types, and the evaluation algorithm.
// Dependencies: crate::{claims, decision, evaluate, policy, request, role}
// ============================================================================

//! ## Overview
//! Claims Gate core decides whether a serverless request may reach its
//! business handler. Claims are assumed to have been verified and placed in
//! the request's authorizer context by the upstream gateway; this crate only
//! evaluates them against an explicit [`Policy`]. Evaluation is pure and
//! synchronous, with no shared state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod claims;
pub mod decision;
pub mod evaluate;
pub mod policy;
pub mod request;
pub mod role;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use claims::ClaimKeys;
pub use claims::ClaimsContext;
pub use claims::ScopeClaim;
pub use decision::AuthzError;
pub use decision::Decision;
pub use decision::Denial;
pub use decision::DenialCategory;
pub use decision::Grant;
pub use evaluate::authorize;
pub use evaluate::evaluate;
pub use evaluate::owner_matches;
pub use evaluate::scope_satisfied;
pub use policy::OwnerResolver;
pub use policy::OwnerRule;
pub use policy::Policy;
pub use request::GatewayRequest;
pub use request::GatewayResponse;
pub use request::RequestContext;
pub use role::Role;
pub use role::UnknownRole;
pub use role::role_satisfied;
