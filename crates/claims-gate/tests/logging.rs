// crates/claims-gate/tests/logging.rs
// ============================================================================
// Module: Gate Logging Tests
// Description: Capture gate events through a JSON subscriber.
// Purpose: Ensure decision severities and fields stay stable and claim-free.
// Dependencies: claims-gate, claims-gate-core, tracing, tracing-subscriber
// ============================================================================

//! Structured logging tests for the authorization gate.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io;
use std::sync::Arc;
use std::sync::Mutex;

use claims_gate::AuthorizationGate;
use claims_gate::authorize;
use claims_gate::handler_fn;
use claims_gate_core::ClaimsContext;
use claims_gate_core::GatewayRequest;
use claims_gate_core::GatewayResponse;
use claims_gate_core::Policy;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

// ============================================================================
// SECTION: Capture
// ============================================================================

/// Shared in-memory sink for formatted events.
#[derive(Clone, Default)]
struct CaptureWriter {
    /// Raw JSON lines.
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    /// Returns every captured event as parsed JSON.
    fn events(&self) -> Vec<Value> {
        let raw = String::from_utf8(self.buf.lock().unwrap().clone()).unwrap();
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `decide` for `request` under a capturing subscriber and returns the single event.
fn capture_decision<H>(gate: &AuthorizationGate<H>, request: &GatewayRequest) -> Value {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(Level::DEBUG)
        .without_time()
        .json()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let _ = gate.decide(request);
    });
    let mut events = writer.events();
    assert_eq!(events.len(), 1, "expected exactly one gate event");
    events.remove(0)
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

async fn never_called(_: GatewayRequest) -> Result<GatewayResponse, String> {
    Err("handler must not run".to_string())
}

fn request(claims: ClaimsContext) -> GatewayRequest {
    let mut request = GatewayRequest::new("GET", "/results").with_claims(claims);
    request.request_context.request_id = Some("req-42".to_string());
    request
}

fn owner_claims() -> ClaimsContext {
    ClaimsContext::new().with_claim("owner_id", "secret-tenant").with_claim("scope", "results")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn allow_is_logged_at_debug_with_grant() {
    let gate = authorize(handler_fn(never_called), Policy::require_scope("results"))
        .named("list_results");
    let event = capture_decision(&gate, &request(owner_claims()));

    assert_eq!(event["level"], "DEBUG");
    assert_eq!(event["fields"]["message"], "request authorized");
    assert_eq!(event["fields"]["policy"], "list_results");
    assert_eq!(event["fields"]["request_id"], "req-42");
    assert_eq!(event["fields"]["grant"], "scope");
}

#[test]
fn denials_are_logged_at_info_with_decision_label() {
    let gate = authorize(handler_fn(never_called), Policy::require_scope("admin"));

    let unauthorized = capture_decision(&gate, &request(owner_claims()));
    assert_eq!(unauthorized["level"], "INFO");
    assert_eq!(unauthorized["fields"]["message"], "request denied");
    assert_eq!(unauthorized["fields"]["decision"], "deny_unauthorized");

    let missing_owner = capture_decision(&gate, &request(ClaimsContext::new()));
    assert_eq!(missing_owner["level"], "INFO");
    assert_eq!(missing_owner["fields"]["decision"], "deny_missing_owner");
    assert_eq!(missing_owner["fields"]["policy"], "unnamed");
}

#[test]
fn misconfiguration_is_logged_at_error_with_detail() {
    let gate = authorize(handler_fn(never_called), Policy::default()).named("broken");
    let event = capture_decision(&gate, &request(owner_claims()));

    assert_eq!(event["level"], "ERROR");
    assert_eq!(event["fields"]["message"], "authorization policy misconfigured");
    assert_eq!(event["fields"]["policy"], "broken");
    assert!(event["fields"]["detail"].as_str().is_some_and(|detail| !detail.is_empty()));
}

#[test]
fn claim_values_are_never_logged() {
    let gate = authorize(handler_fn(never_called), Policy::require_scope("admin"));
    let event = capture_decision(&gate, &request(owner_claims()));

    assert!(!event.to_string().contains("secret-tenant"));
}
