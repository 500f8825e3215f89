// crates/claims-gate/src/response.rs
// ============================================================================
// Module: Response Builder
// Description: JSON envelope construction for gateway proxy responses.
// Purpose: Turn decisions and handler payloads into transport-shaped results.
// Dependencies: claims-gate-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The response builder is the only place status codes, CORS headers, and
//! JSON envelopes are decided. The gate selects a denial category; the
//! builder maps it to a concrete payload.
//!
//! | Capability        | Status | Body                                   |
//! |-------------------|--------|----------------------------------------|
//! | `ok`              | 200    | `{"data": <body>}`                     |
//! | `invalid_request` | 400    | `{"error": <reason>}`                  |
//! | `bad_input`       | 400    | `{"error": "invalid input", "validation": [...]}` |
//! | `unauthorized`    | 401    | `{"error": <reason>}`                  |
//! | `not_found`       | 404    | `{"error": <reason>}`                  |
//! | `internal_error`  | 500    | `{"error": <reason>}`                  |
//!
//! ## Invariants
//! - Builders never fail; serialization problems degrade to a 500 envelope.
//! - Every response carries the permissive CORS headers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use claims_gate_core::Denial;
use claims_gate_core::DenialCategory;
use claims_gate_core::GatewayResponse;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Success status code.
pub const STATUS_OK: u16 = 200;
/// Invalid request status code.
pub const STATUS_INVALID_REQUEST: u16 = 400;
/// Unauthorized status code.
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// Not found status code.
pub const STATUS_NOT_FOUND: u16 = 404;
/// Internal error status code.
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// CORS credentials header name.
pub const ALLOW_CREDENTIALS_HEADER: &str = "Access-Control-Allow-Credentials";
/// CORS origin header name.
pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// Body reason used when a success payload cannot be serialized.
const SERIALIZE_FAILURE_REASON: &str = "error while retrieving items";
/// Body reason used for field validation failures.
const INVALID_INPUT_REASON: &str = "invalid input";

// ============================================================================
// SECTION: Field Errors
// ============================================================================

/// A single field validation failure rendered into a bad-input response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON path of the offending field.
    pub path: String,
    /// Failed rule name.
    pub error: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }
}

/// Body key carrying the human-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReasonField {
    /// `{"error": ...}`.
    #[default]
    Error,
    /// `{"message": ...}`.
    Message,
}

impl ReasonField {
    /// Returns the JSON key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Response-building capability used by the gate and by handlers.
pub trait ResponseBuilder: Send + Sync {
    /// Builds a 200 response wrapping `data`.
    fn ok(&self, data: Value) -> GatewayResponse;
    /// Builds a 400 response.
    fn invalid_request(&self, reason: &str) -> GatewayResponse;
    /// Builds a 400 response listing field validation failures.
    fn bad_input(&self, errors: &[FieldError]) -> GatewayResponse;
    /// Builds a 401 response.
    fn unauthorized(&self, reason: &str) -> GatewayResponse;
    /// Builds a 404 response.
    fn not_found(&self, reason: &str) -> GatewayResponse;
    /// Builds a 500 response.
    fn internal_error(&self, reason: &str) -> GatewayResponse;

    /// Builds the rejection for a gate denial.
    fn reject(&self, denial: Denial) -> GatewayResponse {
        match denial.category {
            DenialCategory::Unauthorized => self.unauthorized(denial.reason),
            DenialCategory::InternalError => self.internal_error(denial.reason),
        }
    }
}

// ============================================================================
// SECTION: JSON Builder
// ============================================================================

/// Default JSON envelope builder with permissive CORS headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseBuilder {
    /// Key used for reason strings.
    reason_field: ReasonField,
}

impl JsonResponseBuilder {
    /// Creates a builder using the `error` reason key.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reason_field: ReasonField::Error,
        }
    }

    /// Returns a builder using the given reason key.
    #[must_use]
    pub const fn with_reason_field(mut self, field: ReasonField) -> Self {
        self.reason_field = field;
        self
    }

    /// Builds a 200 response from any serializable body.
    ///
    /// Falls back to a 500 envelope when `body` cannot be serialized.
    #[must_use]
    pub fn ok_json<T: Serialize + ?Sized>(&self, body: &T) -> GatewayResponse {
        serde_json::to_value(body)
            .map_or_else(|_| self.internal_error(SERIALIZE_FAILURE_REASON), |data| self.ok(data))
    }

    /// Builds a reason envelope.
    fn reason(&self, status: u16, reason: &str) -> GatewayResponse {
        let mut body = serde_json::Map::new();
        body.insert(self.reason_field.as_str().to_string(), Value::String(reason.to_string()));
        envelope(status, &Value::Object(body))
    }
}

impl ResponseBuilder for JsonResponseBuilder {
    fn ok(&self, data: Value) -> GatewayResponse {
        envelope(STATUS_OK, &json!({ "data": data }))
    }

    fn invalid_request(&self, reason: &str) -> GatewayResponse {
        self.reason(STATUS_INVALID_REQUEST, reason)
    }

    fn bad_input(&self, errors: &[FieldError]) -> GatewayResponse {
        let mut body = serde_json::Map::new();
        body.insert(self.reason_field.as_str().to_string(), Value::from(INVALID_INPUT_REASON));
        body.insert("validation".to_string(), json!(errors));
        envelope(STATUS_INVALID_REQUEST, &Value::Object(body))
    }

    fn unauthorized(&self, reason: &str) -> GatewayResponse {
        self.reason(STATUS_UNAUTHORIZED, reason)
    }

    fn not_found(&self, reason: &str) -> GatewayResponse {
        self.reason(STATUS_NOT_FOUND, reason)
    }

    fn internal_error(&self, reason: &str) -> GatewayResponse {
        self.reason(STATUS_INTERNAL_ERROR, reason)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the CORS headers attached to every response.
fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (ALLOW_CREDENTIALS_HEADER.to_string(), "true".to_string()),
        (ALLOW_ORIGIN_HEADER.to_string(), "*".to_string()),
    ])
}

/// Wraps a JSON body into a proxy response.
fn envelope(status: u16, body: &Value) -> GatewayResponse {
    GatewayResponse {
        status_code: status,
        headers: cors_headers(),
        body: body.to_string(),
        is_base64_encoded: false,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
