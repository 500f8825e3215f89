// crates/claims-gate/src/handler.rs
// ============================================================================
// Module: Handler Interface
// Description: Async handler seam for gateway proxy requests.
// Purpose: Let the gate wrap business handlers without knowing their internals.
// Dependencies: async-trait, claims-gate-core
// ============================================================================

//! ## Overview
//! A [`Handler`] turns a gateway request into a proxy response. The handler's
//! error type is associated, so wrappers can forward it without conversion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;

use async_trait::async_trait;
use claims_gate_core::GatewayRequest;
use claims_gate_core::GatewayResponse;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Serverless request handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Error raised for infrastructure failures inside the handler.
    type Error: Send;

    /// Handles a request.
    ///
    /// # Errors
    ///
    /// Returns [`Handler::Error`] when the handler cannot produce a response.
    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse, Self::Error>;
}

// ============================================================================
// SECTION: Closure Adapter
// ============================================================================

/// Handler backed by an async closure.
#[derive(Debug, Clone, Copy)]
pub struct HandlerFn<F> {
    /// Wrapped closure.
    f: F,
}

/// Wraps an async closure as a [`Handler`].
pub const fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn {
        f,
    }
}

#[async_trait]
impl<F, Fut, E> Handler for HandlerFn<F>
where
    F: Fn(GatewayRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GatewayResponse, E>> + Send + 'static,
    E: Send + 'static,
{
    type Error = E;

    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse, E> {
        (self.f)(request).await
    }
}
