// crates/claims-gate-core/src/request.rs
// ============================================================================
// Module: Gateway Request Model
// Description: API gateway proxy request and response envelopes.
// Purpose: Carry the authorizer claims and request attributes to the gate.
// Dependencies: serde, crate::claims
// ============================================================================

//! ## Overview
//! Serde models for the proxy event the gateway hands to a serverless handler
//! and the proxy response the handler returns. Only the attributes the gate
//! and its owner rules consult are modeled; the rest of the event is ignored.
//!
//! ## Invariants
//! - Missing or `null` maps deserialize as empty maps.
//! - The authorizer claims are read-only once the request is constructed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::claims::ClaimsContext;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Gateway request context carrying the authorizer claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Claims populated by the upstream authorizer.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorizer: ClaimsContext,
    /// Gateway-assigned request identifier.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Deployment stage name.
    #[serde(default)]
    pub stage: Option<String>,
}

/// Inbound gateway proxy request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    /// Request path.
    #[serde(default)]
    pub path: String,
    /// Resource template matched by the gateway.
    #[serde(default)]
    pub resource: String,
    /// HTTP method.
    #[serde(default)]
    pub http_method: String,
    /// Request headers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    /// Path template parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_parameters: BTreeMap<String, String>,
    /// Query string parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: BTreeMap<String, String>,
    /// Raw request body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
    /// Gateway request context.
    #[serde(default)]
    pub request_context: RequestContext,
}

impl GatewayRequest {
    /// Creates a request for the given method and path.
    #[must_use]
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            resource: path.clone(),
            path,
            http_method: http_method.into(),
            ..Self::default()
        }
    }

    /// Returns the request with the given authorizer claims.
    #[must_use]
    pub fn with_claims(mut self, claims: ClaimsContext) -> Self {
        self.request_context.authorizer = claims;
        self
    }

    /// Returns the request with an additional path parameter.
    #[must_use]
    pub fn with_path_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// Returns the request with an additional query string parameter.
    #[must_use]
    pub fn with_query_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query_string_parameters.insert(name.into(), value.into());
        self
    }

    /// Returns the request with the given body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the authorizer claims.
    #[must_use]
    pub const fn claims(&self) -> &ClaimsContext {
        &self.request_context.authorizer
    }

    /// Returns a path parameter value.
    #[must_use]
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    /// Returns a query string parameter value.
    #[must_use]
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Outbound gateway proxy response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response body.
    #[serde(default)]
    pub body: String,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Deserializes `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
