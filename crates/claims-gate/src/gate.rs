// crates/claims-gate/src/gate.rs
// ============================================================================
// Module: Authorization Gate
// Description: Handler-wrapping combinator that enforces a policy per request.
// Purpose: Invoke the wrapped handler on allow; short-circuit with a rejection on deny.
// Dependencies: async-trait, claims-gate-core, tracing
// ============================================================================

//! ## Overview
//! [`AuthorizationGate`] closes over an immutable handler, policy, and
//! response builder captured at wrap time. Each request is evaluated
//! independently; the gate holds no mutable state and needs no coordination
//! between concurrent requests.
//!
//! ## Invariants
//! - On allow, the handler is called exactly once with the original request
//!   and its result is returned unchanged.
//! - On deny, the handler is never called and the response carries only a
//!   fixed reason string.
//! - Authorization failures never surface as `Err`; only handler errors do.
//!
//! Security posture: the gate is a trust boundary but does not verify tokens;
//! it relies on claims placed by the upstream authorizer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use async_trait::async_trait;
use claims_gate_core::AuthzError;
use claims_gate_core::Decision;
use claims_gate_core::GatewayRequest;
use claims_gate_core::GatewayResponse;
use claims_gate_core::Policy;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::handler::Handler;
use crate::response::JsonResponseBuilder;
use crate::response::ResponseBuilder;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Policy label used in logs when the gate is not named.
const UNNAMED_POLICY: &str = "unnamed";

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Authorization gate wrapping a handler.
#[derive(Debug, Clone)]
pub struct AuthorizationGate<H, R = JsonResponseBuilder> {
    /// Wrapped handler.
    handler: H,
    /// Policy captured at wrap time.
    policy: Policy,
    /// Builder used for rejections.
    responses: R,
    /// Policy label for logs.
    name: Cow<'static, str>,
}

impl<H> AuthorizationGate<H> {
    /// Wraps `handler` with `policy` using the default JSON response builder.
    #[must_use]
    pub fn new(handler: H, policy: Policy) -> Self {
        Self {
            handler,
            policy,
            responses: JsonResponseBuilder::new(),
            name: Cow::Borrowed(UNNAMED_POLICY),
        }
    }
}

impl<H, R> AuthorizationGate<H, R> {
    /// Replaces the response builder.
    #[must_use]
    pub fn with_responses<R2>(self, responses: R2) -> AuthorizationGate<H, R2> {
        AuthorizationGate {
            handler: self.handler,
            policy: self.policy,
            responses,
            name: self.name,
        }
    }

    /// Sets the policy label used in logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the captured policy.
    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Returns the policy label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the policy for `request` and logs the outcome.
    #[must_use]
    pub fn decide(&self, request: &GatewayRequest) -> Decision {
        let outcome = claims_gate_core::evaluate::authorize(&self.policy, request);
        let request_id = request.request_context.request_id.as_deref().unwrap_or("-");
        match &outcome {
            Ok(grant) => debug!(
                policy = %self.name,
                request_id,
                grant = grant.as_str(),
                "request authorized"
            ),
            Err(AuthzError::Misconfigured(detail)) => error!(
                policy = %self.name,
                request_id,
                detail = *detail,
                "authorization policy misconfigured"
            ),
            Err(err) => info!(
                policy = %self.name,
                request_id,
                decision = Decision::from(*err).as_str(),
                "request denied"
            ),
        }
        Decision::from(outcome)
    }
}

#[async_trait]
impl<H, R> Handler for AuthorizationGate<H, R>
where
    H: Handler,
    R: ResponseBuilder,
{
    type Error = H::Error;

    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse, Self::Error> {
        let denial = self.decide(&request).denial();
        match denial {
            None => self.handler.call(request).await,
            Some(denial) => Ok(self.responses.reject(denial)),
        }
    }
}

/// Wraps `handler` so it only runs for requests that satisfy `policy`.
#[must_use]
pub fn authorize<H: Handler>(handler: H, policy: Policy) -> AuthorizationGate<H> {
    AuthorizationGate::new(handler, policy)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
