// crates/claims-gate/src/lib.rs
// ============================================================================
// Module: Claims Gate Library
// Description: Authorization middleware for serverless gateway handlers.
// Purpose: Expose the gate combinator, handler seam, and response builder.
// Dependencies: crate::{gate, handler, response}, claims-gate-core
// ============================================================================

//! ## Overview
//! Claims Gate wraps a serverless handler with an authorization policy. The
//! gate reads identity and permission claims that the upstream API gateway
//! has already verified, decides allow or deny, and either runs the handler
//! or answers with a rejection envelope.
//!
//! ```ignore
//! use claims_gate::{authorize, handler_fn, Handler};
//! use claims_gate_core::{Policy, Role};
//!
//! let policy = Policy::require_scope("results").with_role(Role::Operator);
//! let gate = authorize(handler_fn(list_results), policy).named("list_results");
//! let response = gate.call(request).await?;
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod gate;
pub mod handler;
pub mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gate::AuthorizationGate;
pub use gate::authorize;
pub use handler::Handler;
pub use handler::HandlerFn;
pub use handler::handler_fn;
pub use response::FieldError;
pub use response::JsonResponseBuilder;
pub use response::ReasonField;
pub use response::ResponseBuilder;
